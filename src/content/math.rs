//! Typed mathematical expression tree.
//!
//! Independent of any input syntax: callers build trees directly.
//!
//! ```rust
//! use ggcompose::content::{Expr, Operator};
//!
//! // R^2 = 0.75
//! let r2 = Expr::op(Operator::Equals, Expr::sup(Expr::lit("R"), Expr::lit("2")), Expr::lit("0.75"));
//! assert_eq!(r2.plain_text().unwrap(), "R² = 0.75");
//! ```

use crate::error::{Error, Result};

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `−`
    Minus,
    /// `×`
    Times,
    /// `/`
    Divide,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `≤`
    LessEq,
    /// `≥`
    GreaterEq,
    /// `≈`
    Approx,
    /// `±`
    PlusMinus,
}

impl Operator {
    /// Glyph used when laying the operator out.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::Plus => "+",
            Operator::Minus => "\u{2212}",
            Operator::Times => "\u{d7}",
            Operator::Divide => "/",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEq => "\u{2264}",
            Operator::GreaterEq => "\u{2265}",
            Operator::Approx => "\u{2248}",
            Operator::PlusMinus => "\u{b1}",
        }
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal run of characters.
    Literal(String),
    /// Named symbol such as `alpha` or `infinity`.
    Symbol(String),
    /// `base` raised by `exponent`.
    Superscript {
        /// Base expression.
        base: Box<Expr>,
        /// Raised expression.
        exponent: Box<Expr>,
    },
    /// `base` lowered by `index`.
    Subscript {
        /// Base expression.
        base: Box<Expr>,
        /// Lowered expression.
        index: Box<Expr>,
    },
    /// Infix operator application.
    Binary {
        /// Operator.
        op: Operator,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Juxtaposed sequence.
    Row(Vec<Expr>),
}

impl Expr {
    /// Literal node.
    #[must_use]
    pub fn lit(s: impl Into<String>) -> Self {
        Expr::Literal(s.into())
    }

    /// Symbol node.
    #[must_use]
    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    /// Superscript node.
    #[must_use]
    pub fn sup(base: Expr, exponent: Expr) -> Self {
        Expr::Superscript { base: Box::new(base), exponent: Box::new(exponent) }
    }

    /// Subscript node.
    #[must_use]
    pub fn sub(base: Expr, index: Expr) -> Self {
        Expr::Subscript { base: Box::new(base), index: Box::new(index) }
    }

    /// Operator node.
    #[must_use]
    pub fn op(op: Operator, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// True if the tree contains no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::Literal(s) => s.is_empty(),
            Expr::Symbol(name) => name.is_empty(),
            Expr::Superscript { base, exponent } => base.is_empty() && exponent.is_empty(),
            Expr::Subscript { base, index } => base.is_empty() && index.is_empty(),
            Expr::Binary { .. } => false,
            Expr::Row(items) => items.iter().all(Expr::is_empty),
        }
    }

    /// Flatten to Unicode text, using script digits where they exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentRender`] for unknown symbol names.
    pub fn plain_text(&self) -> Result<String> {
        let mut out = String::new();
        self.write_plain(&mut out, Script::Normal)?;
        Ok(out)
    }

    fn write_plain(&self, out: &mut String, script: Script) -> Result<()> {
        match self {
            Expr::Literal(s) => out.extend(s.chars().map(|c| script.map(c))),
            Expr::Symbol(name) => out.push(symbol_glyph(name)?),
            Expr::Superscript { base, exponent } => {
                base.write_plain(out, script)?;
                exponent.write_script(out, Script::Super)?;
            }
            Expr::Subscript { base, index } => {
                base.write_plain(out, script)?;
                index.write_script(out, Script::Sub)?;
            }
            Expr::Binary { op, lhs, rhs } => {
                lhs.write_plain(out, script)?;
                out.push(' ');
                out.push_str(op.glyph());
                out.push(' ');
                rhs.write_plain(out, script)?;
            }
            Expr::Row(items) => {
                for item in items {
                    item.write_plain(out, script)?;
                }
            }
        }
        Ok(())
    }

    // Falls back to ^(..) / _(..) when a character has no script form.
    fn write_script(&self, out: &mut String, script: Script) -> Result<()> {
        let mut inner = String::new();
        self.write_plain(&mut inner, Script::Normal)?;
        let mapped: Option<String> = inner.chars().map(|c| script.lookup(c)).collect();
        match mapped {
            Some(s) => out.push_str(&s),
            None => {
                out.push(if script == Script::Super { '^' } else { '_' });
                out.push('(');
                out.push_str(&inner);
                out.push(')');
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Normal,
    Super,
    Sub,
}

impl Script {
    fn map(self, c: char) -> char {
        self.lookup(c).unwrap_or(c)
    }

    fn lookup(self, c: char) -> Option<char> {
        const SUPER: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
        const SUB: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];
        match self {
            Script::Normal => Some(c),
            Script::Super => match c {
                '0'..='9' => Some(SUPER[c as usize - '0' as usize]),
                '+' => Some('⁺'),
                '-' | '\u{2212}' => Some('⁻'),
                'n' => Some('ⁿ'),
                'i' => Some('ⁱ'),
                _ => None,
            },
            Script::Sub => match c {
                '0'..='9' => Some(SUB[c as usize - '0' as usize]),
                '+' => Some('₊'),
                '-' | '\u{2212}' => Some('₋'),
                _ => None,
            },
        }
    }
}

/// Unicode glyph for a named symbol.
///
/// # Errors
///
/// Returns [`Error::ContentRender`] if the name is not known.
pub fn symbol_glyph(name: &str) -> Result<char> {
    let glyph = match name {
        "alpha" => 'α',
        "beta" => 'β',
        "gamma" => 'γ',
        "delta" => 'δ',
        "epsilon" => 'ε',
        "theta" => 'θ',
        "lambda" => 'λ',
        "mu" => 'μ',
        "pi" => 'π',
        "rho" => 'ρ',
        "sigma" => 'σ',
        "tau" => 'τ',
        "phi" => 'φ',
        "chi" => 'χ',
        "omega" => 'ω',
        "Delta" => 'Δ',
        "Sigma" => 'Σ',
        "Omega" => 'Ω',
        "infinity" => '∞',
        "degree" => '°',
        "partial" => '∂',
        _ => return Err(Error::ContentRender(format!("unknown math symbol '{name}'"))),
    };
    Ok(glyph)
}
