use std::io::{self, BufRead};

/// Supplies one cell value per `,` instruction. `Ok(None)` means end of input.
pub trait InputSource {
    fn read_cell(&mut self) -> io::Result<Option<u8>>;
}

/// Reads whitespace-delimited tokens from a shared buffered reader.
///
/// A token that parses as an integer becomes that value modulo 256; any other
/// token contributes its first byte. The single whitespace byte ending the
/// token is consumed so a following line read starts cleanly.
pub struct TokenInput<R: BufRead> {
    reader: R,
}

impl<R: BufRead> TokenInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut token = Vec::new();
        loop {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if chunk.is_empty() {
                return Ok((!token.is_empty()).then_some(token));
            }

            let mut used = 0;
            let mut done = false;
            for &byte in chunk {
                used += 1;
                if byte.is_ascii_whitespace() {
                    if !token.is_empty() {
                        done = true;
                        break;
                    }
                } else {
                    token.push(byte);
                }
            }
            self.reader.consume(used);
            if done {
                return Ok(Some(token));
            }
        }
    }
}

impl<R: BufRead> InputSource for TokenInput<R> {
    fn read_cell(&mut self) -> io::Result<Option<u8>> {
        Ok(self.next_token()?.map(|token| token_to_cell(&token)))
    }
}

/// Convert a token to a cell value.
///
/// Signed decimal integers of any length are reduced modulo 256 digit by digit.
pub fn token_to_cell(token: &[u8]) -> u8 {
    let (negative, digits) = match token {
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] => (false, rest),
        _ => (false, token),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return token.first().copied().unwrap_or(0);
    }

    let value = digits
        .iter()
        .fold(0u8, |acc, d| acc.wrapping_mul(10).wrapping_add(d - b'0'));
    if negative { value.wrapping_neg() } else { value }
}

/// Replays a fixed list of values, then reports end of input.
impl InputSource for std::collections::VecDeque<u8> {
    fn read_cell(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}
