//! Parsing of written type expressions such as `Ui.IValueConverter<int, string>`.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::Error;
use crate::types::TypeRef;

/// Cursor over a type expression. Tracks the original text for error messages.
struct Cursor<'a> {
    /// Remaining characters with their byte offsets.
    chars: Peekable<CharIndices<'a>>,
    /// The full expression being parsed.
    text: &'a str,
}

impl<'a> Cursor<'a> {
    /// Build an `InvalidTypeExpression` error for the current text.
    fn error(&self, reason: &str) -> Error {
        return Error::InvalidTypeExpression {
            expr: self.text.to_string(),
            reason: reason.to_string(),
        };
    }

    /// Consume `expected` (after whitespace) or fail.
    fn expect(&mut self, expected: char) -> Result<(), Error> {
        self.skip_whitespace();
        return match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((offset, c)) => {
                Err(self.error(&format!("expected `{expected}` at byte {offset}, found `{c}`")))
            },
            None => Err(self.error(&format!("expected `{expected}`, found end of input"))),
        };
    }

    /// Parse a dotted identifier path such as `Ui.Bindable.ObservableObject`.
    fn name(&mut self) -> Result<String, Error> {
        self.skip_whitespace();
        let mut name = String::new();
        loop {
            let segment = self.segment()?;
            name.push_str(&segment);
            if self.chars.peek().is_none_or(|&(_, c)| return c != '.') {
                return Ok(name);
            }
            self.chars.next();
            name.push('.');
        }
    }

    /// Build a cursor over `text`.
    fn new(text: &'a str) -> Self {
        return Self {
            chars: text.char_indices().peekable(),
            text,
        };
    }

    /// Look at the next non-whitespace character without consuming it.
    fn peek_significant(&mut self) -> Option<char> {
        self.skip_whitespace();
        return self.chars.peek().map(|&(_, c)| return c);
    }

    /// Parse a single identifier segment.
    fn segment(&mut self) -> Result<String, Error> {
        let mut segment = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            segment.push(c);
            self.chars.next();
        }
        if segment.is_empty() || segment.starts_with(|c: char| return c.is_ascii_digit()) {
            return Err(self.error("expected an identifier"));
        }
        return Ok(segment);
    }

    /// Skip whitespace.
    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|&(_, c)| return c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Parse `Name` or `Name<Arg, ...>`.
    fn type_ref(&mut self) -> Result<TypeRef, Error> {
        let name = self.name()?;
        if self.peek_significant() != Some('<') {
            return Ok(TypeRef::named(&name));
        }
        self.expect('<')?;
        let mut args = vec![self.type_ref()?];
        while self.peek_significant() == Some(',') {
            self.expect(',')?;
            args.push(self.type_ref()?);
        }
        self.expect('>')?;
        return Ok(TypeRef::generic(&name, args));
    }
}

/// Parse a type expression.
///
/// # Errors
///
/// Returns `Error::InvalidTypeExpression` when the text is not a well-formed
/// dotted name with optional, possibly nested, generic arguments.
pub fn parse_type(text: &str) -> Result<TypeRef, Error> {
    let mut cursor = Cursor::new(text);
    let ty = cursor.type_ref()?;
    if let Some(c) = cursor.peek_significant() {
        return Err(cursor.error(&format!("unexpected `{c}` after type")));
    }
    return Ok(ty);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name() {
        assert_eq!(parse_type("int").unwrap(), TypeRef::named("int"));
        assert_eq!(parse_type("  Ui.IElement ").unwrap(), TypeRef::named("Ui.IElement"));
    }

    #[test]
    fn nested_generics() {
        let ty =
            parse_type("Ui.Bindable.BindableProperty<Ui.Bindable.CommandTemplate<int, string>>")
                .unwrap();
        assert_eq!(ty.name, "Ui.Bindable.BindableProperty");
        assert_eq!(ty.args.len(), 1);
        assert_eq!(ty.args[0].to_string(), "Ui.Bindable.CommandTemplate<int, string>");
    }

    #[test]
    fn round_trips_display_form() {
        let text = "Ui.IValueConverter<int, App.Money<decimal>>";
        assert_eq!(parse_type(text).unwrap().to_string(), text);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "Foo<", "Foo<>", "Foo<int,>", "Foo.", "1Foo", "Foo<int> bar", "Foo>"] {
            assert!(
                matches!(parse_type(bad), Err(Error::InvalidTypeExpression { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
