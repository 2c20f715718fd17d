use nu_ansi_term::Style;
use reedline::{Highlighter, StyledText};

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const SURFACE2: Color = Color::Rgb(108, 112, 134);  // comments

        pub const RED: Color = Color::Rgb(243, 139, 168);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
        pub const YELLOW: Color = Color::Rgb(249, 226, 175);
        pub const MAUVE: Color = Color::Rgb(203, 166, 247);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
        pub const TEAL: Color = Color::Rgb(148, 226, 213);
        pub const SKY: Color = Color::Rgb(137, 220, 235);
    }
}

/// Colors opcodes by role while the user types; everything else is dimmed as a comment.
#[derive(Default)]
pub struct OpcodeHighlighter {
    movement_right: Style,
    movement_left: Style,
    increment: Style,
    decrement: Style,
    output: Style,
    input: Style,
    loops: Style,
    comment: Style,
}

impl OpcodeHighlighter {
    pub fn new_catppuccin_mocha() -> Self {
        use catppuccin::Mocha as P;

        Self {
            movement_right: Style::new().fg(P::SKY).bold(),
            movement_left: Style::new().fg(P::TEAL).bold(),
            increment: Style::new().fg(P::GREEN).bold(),
            decrement: Style::new().fg(P::RED).bold(),
            output: Style::new().fg(P::YELLOW).bold(),
            input: Style::new().fg(P::PEACH).bold(),
            loops: Style::new().fg(P::MAUVE).bold(),
            comment: Style::new().fg(P::SURFACE2),
        }
    }

    #[inline]
    fn style_for(&self, ch: char) -> Style {
        match ch {
            '>' => self.movement_right,
            '<' => self.movement_left,
            '+' => self.increment,
            '-' => self.decrement,
            '.' => self.output,
            ',' => self.input,
            '[' | ']' => self.loops,
            _ => self.comment,
        }
    }

    /// Split `line` into runs of equally styled characters.
    fn runs(&self, line: &str) -> Vec<(Style, String)> {
        let mut out: Vec<(Style, String)> = Vec::new();
        for ch in line.chars() {
            let style = self.style_for(ch);
            if let Some((s, run)) = out.last_mut() {
                if *s == style {
                    run.push(ch);
                    continue;
                }
            }
            out.push((style, ch.to_string()));
        }
        out
    }
}

impl Highlighter for OpcodeHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        for run in self.runs(line) {
            styled.push(run);
        }
        styled
    }
}
