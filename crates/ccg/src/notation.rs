//! Textual category notation.
//!
//! ```text
//! category := operand ( ('<' | '>') category )?
//! operand  := name | '$' name | '(' category ')'
//! ```
//!
//! Both operators are right-associative at equal precedence, so `a<b<c`
//! reads as `a<(b<c)`. Names are runs of letters, digits and `_[]:`.
//! Variables are written `$name`; every occurrence of the same name within
//! one call denotes the same variable.
//!
//! # Example
//!
//! ```
//! use compositional_ccg::category::VarSupply;
//! use compositional_ccg::notation::parse_category;
//!
//! let mut supply = VarSupply::new();
//! let verb = parse_category("(np>s)<np", &mut supply).unwrap();
//! assert_eq!(verb.to_string(), "(np>s)<np");
//! ```

use crate::category::{Category, VarId, VarSupply};
use crate::error::CcgError;
use std::collections::HashMap;

/// Read a single category.
pub fn parse_category(src: &str, supply: &mut VarSupply) -> Result<Category, CcgError> {
    let mut reader = Reader::new(src, supply);
    let cat = reader.category()?;
    reader.expect_end()?;
    Ok(cat)
}

/// Read a comma-separated sequence of categories.
///
/// Variable names are shared across the whole sequence.
pub fn parse_sequence(src: &str, supply: &mut VarSupply) -> Result<Vec<Category>, CcgError> {
    let mut reader = Reader::new(src, supply);
    let mut cats = Vec::new();
    if reader.at_end() {
        return Ok(cats);
    }
    loop {
        cats.push(reader.category()?);
        if !reader.eat(',') {
            break;
        }
    }
    reader.expect_end()?;
    Ok(cats)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '[' | ']' | ':')
}

struct Reader<'a> {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
    vars: HashMap<String, VarId>,
    supply: &'a mut VarSupply,
}

impl<'a> Reader<'a> {
    fn new(src: &str, supply: &'a mut VarSupply) -> Self {
        Self {
            chars: src.char_indices().collect(),
            pos: 0,
            len: src.len(),
            vars: HashMap::new(),
            supply,
        }
    }

    fn skip_ws(&mut self) {
        while self
            .chars
            .get(self.pos)
            .is_some_and(|(_, c)| c.is_whitespace())
        {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|(i, _)| *i).unwrap_or(self.len)
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> CcgError {
        CcgError::Notation {
            position: self.offset(),
            message: message.into(),
        }
    }

    fn expect_end(&mut self) -> Result<(), CcgError> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("unexpected '{}'", c))),
        }
    }

    fn category(&mut self) -> Result<Category, CcgError> {
        let head = self.operand()?;
        if self.eat('<') {
            let arg = self.category()?;
            Ok(Category::left(head, arg))
        } else if self.eat('>') {
            let ret = self.category()?;
            Ok(Category::right(head, ret))
        } else {
            Ok(head)
        }
    }

    fn operand(&mut self) -> Result<Category, CcgError> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.category()?;
                if !self.eat(')') {
                    return Err(self.error("expected ')'"));
                }
                Ok(inner)
            }
            Some('$') => {
                self.pos += 1;
                let name = self.name()?;
                if let Some(var) = self.vars.get(&name) {
                    return Ok(Category::Unbound(*var));
                }
                let var = self.supply.fresh().ok_or(CcgError::VariablesExhausted)?;
                self.vars.insert(name, var);
                Ok(Category::Unbound(var))
            }
            Some(_) => Ok(Category::Atomic(self.name()?)),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn name(&mut self) -> Result<String, CcgError> {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|(_, c)| is_name_char(*c))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a category name"));
        }
        Ok(self.chars[start..self.pos].iter().map(|(_, c)| c).collect())
    }
}
