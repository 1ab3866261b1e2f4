//! Filter compiler: declarative filter expressions into feature predicates.
//!
//! Each expression node becomes a boxed closure when compiled, so the
//! per-feature path is plain closure calls with no expression matching.
//! Every structural check (operator names, arity, key and literal types)
//! happens here; a compiled predicate cannot fail.
//!
//! Runtime type mismatches never match: `["<", "height", 10]` is false for a
//! feature whose `height` is a string.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use style_common::{Feature, StyleError, StyleResult};

type Predicate = Arc<dyn Fn(&Feature) -> bool + Send + Sync>;

/// A compiled filter.
#[derive(Clone)]
pub struct FeatureFilter {
    predicate: Predicate,
}

impl FeatureFilter {
    /// The filter used when a layer declares none.
    pub fn always() -> Self {
        Self::constant(true)
    }

    fn constant(value: bool) -> Self {
        Self {
            predicate: Arc::new(move |_: &Feature| value),
        }
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        (self.predicate)(feature)
    }
}

impl fmt::Debug for FeatureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureFilter").finish_non_exhaustive()
    }
}

impl Default for FeatureFilter {
    fn default() -> Self {
        Self::always()
    }
}

/// Compile an optional filter expression.
pub fn compile_filter(expr: Option<&Value>) -> StyleResult<FeatureFilter> {
    match expr {
        None | Some(Value::Null) => Ok(FeatureFilter::always()),
        Some(expr) => Ok(FeatureFilter {
            predicate: compile_expr(expr)?,
        }),
    }
}

fn malformed(message: impl Into<String>) -> StyleError {
    StyleError::MalformedFilter(message.into())
}

// =============================================================================
// Keys and literals
// =============================================================================

/// Where a comparison reads its left-hand side from.
#[derive(Debug, Clone)]
enum Key {
    GeometryType,
    Id,
    Property(String),
}

impl Key {
    fn parse(value: &Value) -> StyleResult<Self> {
        match value.as_str() {
            Some("$type") => Ok(Key::GeometryType),
            Some("$id") => Ok(Key::Id),
            Some(name) => Ok(Key::Property(name.to_string())),
            None => Err(malformed(format!("filter key must be a string, got {}", value))),
        }
    }

    fn get<'a>(&self, feature: &'a Feature) -> Option<Lookup<'a>> {
        match self {
            Key::GeometryType => Some(Lookup::Str(feature.geometry_type.as_str())),
            Key::Id => feature.id.as_ref().map(Lookup::Json),
            Key::Property(name) => feature.property(name).map(Lookup::Json),
        }
    }

    fn exists(&self, feature: &Feature) -> bool {
        match self {
            Key::GeometryType => true,
            Key::Id => feature.id.is_some(),
            Key::Property(name) => feature.has_property(name),
        }
    }
}

/// A value read from a feature.
enum Lookup<'a> {
    Str(&'a str),
    Json(&'a Value),
}

impl Lookup<'_> {
    fn as_literal(&self) -> Option<Literal> {
        match self {
            Lookup::Str(s) => Some(Literal::Str((*s).to_string())),
            Lookup::Json(v) => Literal::from_json(v).ok(),
        }
    }

    fn compare(&self, literal: &Literal) -> Option<Ordering> {
        match (self, literal) {
            (Lookup::Str(s), Literal::Str(l)) => Some((*s).cmp(l.as_str())),
            (Lookup::Json(Value::String(s)), Literal::Str(l)) => Some(s.as_str().cmp(l.as_str())),
            (Lookup::Json(Value::Number(n)), Literal::Num(l)) => n.as_f64()?.partial_cmp(l),
            (Lookup::Json(Value::Bool(b)), Literal::Bool(l)) => Some(b.cmp(l)),
            (Lookup::Json(Value::Null), Literal::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

/// A scalar literal on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
}

impl Literal {
    fn from_json(value: &Value) -> StyleResult<Self> {
        match value {
            Value::Null => Ok(Literal::Null),
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(Literal::Num)
                .ok_or_else(|| malformed(format!("unrepresentable number {}", n))),
            Value::String(s) => Ok(Literal::Str(s.clone())),
            other => Err(malformed(format!("filter literal must be a scalar, got {}", other))),
        }
    }
}

/// Literal list of an `in` expression, hashed per type.
#[derive(Debug, Default)]
struct LiteralSet {
    strings: HashSet<String>,
    numbers: HashSet<u64>,
    bools: [bool; 2],
    null: bool,
}

fn number_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}

impl LiteralSet {
    fn insert(&mut self, literal: Literal) {
        match literal {
            Literal::Null => self.null = true,
            Literal::Bool(b) => self.bools[b as usize] = true,
            Literal::Num(n) => {
                self.numbers.insert(number_bits(n));
            }
            Literal::Str(s) => {
                self.strings.insert(s);
            }
        }
    }

    fn contains(&self, literal: &Literal) -> bool {
        match literal {
            Literal::Null => self.null,
            Literal::Bool(b) => self.bools[*b as usize],
            Literal::Num(n) => self.numbers.contains(&number_bits(*n)),
            Literal::Str(s) => self.strings.contains(s),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

fn compile_expr(expr: &Value) -> StyleResult<Predicate> {
    let items = match expr {
        Value::Bool(b) => {
            let b = *b;
            return Ok(Arc::new(move |_: &Feature| b));
        }
        Value::Array(items) => items,
        other => return Err(malformed(format!("filter must be an array, got {}", other))),
    };

    let (op, operands) = match items.split_first() {
        Some((Value::String(op), operands)) => (op.as_str(), operands),
        Some((other, _)) => {
            return Err(malformed(format!("filter operator must be a string, got {}", other)))
        }
        None => return Err(malformed("empty filter expression")),
    };

    match op {
        "==" | "!=" | "<" | "<=" | ">" | ">=" => compile_comparison(op, operands),
        "in" => compile_membership(operands, false),
        "!in" => compile_membership(operands, true),
        "has" => compile_has(operands, false),
        "!has" => compile_has(operands, true),
        "all" => {
            let children = compile_children(operands)?;
            Ok(Arc::new(move |f: &Feature| children.iter().all(|c| c(f))))
        }
        "any" => {
            let children = compile_children(operands)?;
            Ok(Arc::new(move |f: &Feature| children.iter().any(|c| c(f))))
        }
        "none" => {
            let children = compile_children(operands)?;
            Ok(Arc::new(move |f: &Feature| !children.iter().any(|c| c(f))))
        }
        other => Err(malformed(format!("unknown filter operator '{}'", other))),
    }
}

fn compile_children(operands: &[Value]) -> StyleResult<Vec<Predicate>> {
    operands.iter().map(compile_expr).collect()
}

fn compile_comparison(op: &str, operands: &[Value]) -> StyleResult<Predicate> {
    let [key, literal] = operands else {
        return Err(malformed(format!(
            "'{}' takes a key and a value, got {} operands",
            op,
            operands.len()
        )));
    };
    let key = Key::parse(key)?;
    let literal = Literal::from_json(literal)?;

    let predicate: Predicate = match op {
        "==" => Arc::new(move |f: &Feature| {
            key.get(f).and_then(|v| v.compare(&literal)) == Some(Ordering::Equal)
        }),
        "!=" => Arc::new(move |f: &Feature| {
            key.get(f).and_then(|v| v.compare(&literal)) != Some(Ordering::Equal)
        }),
        "<" => Arc::new(move |f: &Feature| {
            matches!(key.get(f).and_then(|v| v.compare(&literal)), Some(Ordering::Less))
        }),
        "<=" => Arc::new(move |f: &Feature| {
            matches!(
                key.get(f).and_then(|v| v.compare(&literal)),
                Some(Ordering::Less | Ordering::Equal)
            )
        }),
        ">" => Arc::new(move |f: &Feature| {
            matches!(key.get(f).and_then(|v| v.compare(&literal)), Some(Ordering::Greater))
        }),
        _ => Arc::new(move |f: &Feature| {
            matches!(
                key.get(f).and_then(|v| v.compare(&literal)),
                Some(Ordering::Greater | Ordering::Equal)
            )
        }),
    };
    Ok(predicate)
}

fn compile_membership(operands: &[Value], negate: bool) -> StyleResult<Predicate> {
    let Some((key, values)) = operands.split_first() else {
        return Err(malformed("'in' needs a key"));
    };
    let key = Key::parse(key)?;

    // ["in", key, [a, b]] and ["in", key, a, b] are both accepted
    let values = match values {
        [Value::Array(list)] => list.as_slice(),
        _ => values,
    };

    let mut set = LiteralSet::default();
    for value in values {
        set.insert(Literal::from_json(value)?);
    }

    Ok(Arc::new(move |f: &Feature| {
        let found = key
            .get(f)
            .and_then(|v| v.as_literal())
            .is_some_and(|lit| set.contains(&lit));
        found != negate
    }))
}

fn compile_has(operands: &[Value], negate: bool) -> StyleResult<Predicate> {
    let [key] = operands else {
        return Err(malformed(format!(
            "'has' takes exactly one key, got {} operands",
            operands.len()
        )));
    };
    let key = Key::parse(key)?;
    Ok(Arc::new(move |f: &Feature| key.exists(f) != negate))
}
