use crate::core::decls::{Port, Transport};
use crate::core::evt::ParseErrorKind;
use crate::core::ids::QualifiedId;

/// `isspace` semantics, including vertical tab.
fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

/// A byte cursor over a single statement. All extractors skip leading
/// whitespace and advance the cursor past what they consumed.
pub struct Cursor<'a> {
    chunk: &'a str,
    pos: usize,
}

#[derive(Debug, Clone, Copy)]
struct PortSpec {
    number: u16,
    transport: Option<Transport>,
}

impl<'a> Cursor<'a> {
    pub fn new(chunk: &'a str) -> Self {
        Self { chunk, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'a str {
        &self.chunk[self.pos..]
    }

    fn byte(&self, idx: usize) -> Option<u8> {
        self.chunk.as_bytes().get(idx).copied()
    }

    pub fn eat_spaces(&mut self) {
        while let Some(b) = self.byte(self.pos)
            && is_space(b)
        {
            self.pos += 1;
        }
    }

    fn skip_spaces_from(&self, mut idx: usize) -> usize {
        while let Some(b) = self.byte(idx)
            && is_space(b)
        {
            idx += 1;
        }
        idx
    }

    /// If `token` follows (after whitespace), returns the offset just past it.
    pub fn looking_at(&self, token: &str) -> Option<usize> {
        let start = self.skip_spaces_from(self.pos);
        self.chunk[start..]
            .starts_with(token)
            .then_some(start + token.len())
    }

    pub fn is_looking_at(&self, token: &str) -> bool {
        self.looking_at(token).is_some()
    }

    pub fn eat_token(&mut self, token: &str) -> Result<(), ParseErrorKind> {
        match self.looking_at(token) {
            Some(end) => {
                self.pos = end;
                Ok(())
            }
            None => Err(ParseErrorKind::ExpectedToken(token.to_string())),
        }
    }

    /// Consumes `token` if it follows; reports whether it did.
    pub fn eat_if(&mut self, token: &str) -> bool {
        self.eat_token(token).is_ok()
    }

    fn is_id_char(&self, idx: usize) -> bool {
        let Some(c) = self.byte(idx) else {
            return false;
        };

        if c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'%') {
            return true;
        }

        let prev = idx.checked_sub(1).and_then(|i| self.byte(i));
        let next = self.byte(idx + 1);
        c == b':' && (next == Some(b':') || prev == Some(b':'))
    }

    fn take_while(&mut self, mut pred: impl FnMut(&Self, usize) -> bool) -> &'a str {
        self.eat_spaces();
        let start = self.pos;
        let mut end = start;
        while end < self.chunk.len() && pred(self, end) {
            end += 1;
        }
        self.pos = end;
        &self.chunk[start..end]
    }

    pub fn extract_id(&mut self) -> Result<QualifiedId, ParseErrorKind> {
        let id = self.take_while(|cursor, idx| cursor.is_id_char(idx));
        if id.is_empty() {
            return Err(ParseErrorKind::ExpectedId);
        }
        Ok(QualifiedId::from_source(id))
    }

    pub fn extract_path(&mut self) -> Result<String, ParseErrorKind> {
        let path = self.take_while(|cursor, idx| {
            cursor.byte(idx).is_some_and(|b| !is_space(b) && b != b';')
        });
        if path.is_empty() {
            return Err(ParseErrorKind::ExpectedPath);
        }
        Ok(path.to_string())
    }

    /// Like [`Cursor::extract_path`], but a `,` also ends the token so that
    /// another clause can follow.
    pub fn extract_mime_type(&mut self) -> Result<String, ParseErrorKind> {
        let mime = self.take_while(|cursor, idx| {
            cursor
                .byte(idx)
                .is_some_and(|b| !is_space(b) && b != b';' && b != b',')
        });
        if mime.is_empty() {
            return Err(ParseErrorKind::ExpectedPath);
        }
        Ok(mime.to_string())
    }

    pub fn extract_int(&mut self) -> Result<i64, ParseErrorKind> {
        self.eat_spaces();
        let start = self.pos;
        let mut end = start;

        if matches!(self.byte(end), Some(b'-' | b'+')) {
            end += 1;
        }

        let digits_start = end;
        while let Some(b) = self.byte(end)
            && b.is_ascii_digit()
        {
            end += 1;
        }

        if end == digits_start {
            return Err(ParseErrorKind::ExpectedInteger);
        }

        let text = &self.chunk[start..end];
        self.pos = end;
        text.parse::<i64>()
            .map_err(|_| ParseErrorKind::IntegerOutOfRange(text.to_string()))
    }

    fn extract_port_spec(&mut self) -> Result<PortSpec, ParseErrorKind> {
        let digits = self.take_while(|cursor, idx| cursor.byte(idx).is_some_and(|b| b.is_ascii_digit()));
        if digits.is_empty() {
            return Err(ParseErrorKind::InvalidPort);
        }

        let number = digits
            .parse::<u64>()
            .ok()
            .filter(|n| *n <= u64::from(u16::MAX))
            .ok_or(ParseErrorKind::PortOutOfRange)?;

        if self.byte(self.pos) != Some(b'/') {
            return Ok(PortSpec {
                number: number as u16,
                transport: None,
            });
        }
        self.pos += 1;

        let transport = [Transport::Tcp, Transport::Udp, Transport::Icmp]
            .into_iter()
            .find(|transport| self.is_looking_at(transport.keyword()))
            .ok_or(ParseErrorKind::InvalidPort)?;
        self.eat_token(transport.keyword())?;

        Ok(PortSpec {
            number: number as u16,
            transport: Some(transport),
        })
    }

    /// Parses `PORT/PROTO` or a closed range `START[/PROTO]-END/PROTO`.
    pub fn extract_ports(&mut self) -> Result<Vec<Port>, ParseErrorKind> {
        let mut endpoints = vec![self.extract_port_spec()?];
        while self.eat_if("-") {
            endpoints.push(self.extract_port_spec()?);
        }

        let mut explicit = endpoints.iter().filter_map(|spec| spec.transport);
        let transport = explicit.next().ok_or(ParseErrorKind::InvalidPort)?;
        if explicit.any(|other| other != transport) {
            return Err(ParseErrorKind::PortRangeProtocolMismatch);
        }

        match endpoints.as_slice() {
            [single] => {
                if single.transport.is_none() {
                    return Err(ParseErrorKind::InvalidPort);
                }
                Ok(vec![Port::new(single.number, transport)])
            }
            [start, end] => {
                if end.transport.is_none() {
                    return Err(ParseErrorKind::InvalidPort);
                }
                if start.number > end.number {
                    return Err(ParseErrorKind::PortRangeInverted);
                }
                Ok((start.number..=end.number)
                    .map(|number| Port::new(number, transport))
                    .collect())
            }
            _ => Err(ParseErrorKind::PortRangeTooManyEndpoints),
        }
    }

    /// Extracts a bracket-balanced expression ending at a top-level `,` or
    /// `)`. String literals are skipped over as a unit.
    pub fn extract_expr(&mut self) -> Result<String, ParseErrorKind> {
        self.eat_spaces();
        let start = self.pos;
        let mut level = 0usize;
        let mut idx = start;

        while let Some(b) = self.byte(idx) {
            match b {
                b'(' | b'[' | b'{' => level += 1,
                b')' | b',' if level == 0 => break,
                b')' | b']' | b'}' => {
                    if level == 0 {
                        return Err(ParseErrorKind::UnbalancedBracket(b as char));
                    }
                    level -= 1;
                }
                b'"' => idx = self.skip_string(idx)?,
                _ => {}
            }
            idx += 1;
        }

        let expr = self.chunk[start..idx].trim();
        self.pos = idx;
        if expr.is_empty() {
            return Err(ParseErrorKind::ExpectedExpression);
        }
        Ok(expr.to_string())
    }

    /// Given the index of an opening quote, returns the index of its closing one.
    fn skip_string(&self, open: usize) -> Result<usize, ParseErrorKind> {
        let mut idx = open + 1;
        while let Some(b) = self.byte(idx) {
            match b {
                b'\\' => idx += 2,
                b'"' => return Ok(idx),
                _ => idx += 1,
            }
        }
        Err(ParseErrorKind::UnterminatedString)
    }
}

#[cfg(test)]
#[path = "../../tests/evt/t_cursor.rs"]
mod tests;
