// The canonical text grammar for patterns, translator sets, and TECs.
//
//   point set:   P(p(x,y),p(x,y),...)     or P()
//   vector set:  V(v(x,y),v(x,y),...)     or V()
//   TEC:         T(<point set>,<vector set>)
//
// where x and y are (possibly negative) decimal integers. The grammar is
// exact: no whitespace, elements in canonical order. Writers normalize a
// TEC so the pattern is the occurrence selected by the first translator
// and the translator set is re-based to start at v(0,0); `parse` then
// `write` is the identity on any string `write` can produce.
//
// Errors carry the byte position and a snippet of what was found there,
// so a malformed 10 KB TEC line points at the offending substring rather
// than just failing.

use crate::error::ParseError;
use crate::point::{Point, Vector};
use crate::point_set::PointSet;
use crate::vector_set::VectorSet;

/// Parse a `P(...)` point set. The whole input must be consumed.
pub fn parse_point_set(input: &str) -> Result<PointSet, ParseError> {
    let mut r = Reader::new(input);
    let set = r.point_set()?;
    r.expect_end()?;
    Ok(set)
}

/// Parse a `V(...)` vector set. The whole input must be consumed.
pub fn parse_vector_set(input: &str) -> Result<VectorSet, ParseError> {
    let mut r = Reader::new(input);
    let set = r.vector_set()?;
    r.expect_end()?;
    Ok(set)
}

/// Parse a `T(P(...),V(...))` TEC into its pattern and translator set.
pub fn parse_tec(input: &str) -> Result<(PointSet, VectorSet), ParseError> {
    let mut r = Reader::new(input);
    r.expect(b'T', "'T'")?;
    r.expect(b'(', "'('")?;
    let pattern = r.point_set()?;
    r.expect(b',', "','")?;
    let translators = r.vector_set()?;
    r.expect(b')', "')'")?;
    r.expect_end()?;
    Ok((pattern, translators))
}

/// Write a TEC in normalized form: the pattern shown is the occurrence
/// under the first translator, and the translator set is re-based so its
/// first element is `v(0,0)`.
pub fn write_tec(pattern: &PointSet, translators: &VectorSet) -> String {
    match translators.first() {
        Some(first) => {
            let norm_pattern = pattern.translate(first);
            let norm_translators = translators.translate(first.inverse());
            format!("T({norm_pattern},{norm_translators})")
        }
        None => format!("T({pattern},{translators})"),
    }
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader { input, pos: 0 }
    }

    fn err(&self, expected: &'static str) -> ParseError {
        ParseError::new(self.pos, expected, self.input)
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.err(expected))
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.err("end of input"))
        }
    }

    fn integer<T>(&mut self) -> Result<T, ParseError>
    where
        T: std::str::FromStr,
    {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = &self.input[start..self.pos];
        text.parse().map_err(|_| {
            self.pos = start;
            self.err("an integer")
        })
    }

    /// `p(x,y)`
    fn point(&mut self) -> Result<Point, ParseError> {
        self.expect(b'p', "'p'")?;
        self.expect(b'(', "'('")?;
        let onset = self.integer()?;
        self.expect(b',', "','")?;
        let pitch = self.integer()?;
        self.expect(b')', "')'")?;
        Ok(Point::new(onset, pitch))
    }

    /// `v(x,y)`
    fn vector(&mut self) -> Result<Vector, ParseError> {
        self.expect(b'v', "'v'")?;
        self.expect(b'(', "'('")?;
        let dt = self.integer()?;
        self.expect(b',', "','")?;
        let dp = self.integer()?;
        self.expect(b')', "')'")?;
        Ok(Vector::new(dt, dp))
    }

    /// `P(...)`
    fn point_set(&mut self) -> Result<PointSet, ParseError> {
        self.expect(b'P', "'P'")?;
        self.expect(b'(', "'('")?;
        let mut points = Vec::new();
        if self.peek() != Some(b')') {
            points.push(self.point()?);
            while self.peek() == Some(b',') {
                self.pos += 1;
                points.push(self.point()?);
            }
        }
        self.expect(b')', "')' or ','")?;
        Ok(PointSet::from_points(points))
    }

    /// `V(...)`
    fn vector_set(&mut self) -> Result<VectorSet, ParseError> {
        self.expect(b'V', "'V'")?;
        self.expect(b'(', "'('")?;
        let mut vectors = Vec::new();
        if self.peek() != Some(b')') {
            vectors.push(self.vector()?);
            while self.peek() == Some(b',') {
                self.pos += 1;
                vectors.push(self.vector()?);
            }
        }
        self.expect(b')', "')' or ','")?;
        Ok(VectorSet::from_vectors(vectors))
    }
}
