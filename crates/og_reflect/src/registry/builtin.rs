//! Provide the built-in leaf factories for the primitive vocabulary.

use std::borrow::Cow;

use og_graph::{Leaf, tag};

use crate::registry::factory::{ConstructionError, LeafFactory, render_mismatch};

// -----------------------------------------------------------------------------
// Numeric factories

macro_rules! numeric_factory {
    ($(#[$doc:meta] $factory:ident, $tag:path, $variant:ident, $ty:ty;)*) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $factory;

            impl LeafFactory for $factory {
                fn tag(&self) -> &str {
                    $tag
                }

                fn construct(&self, text: &str) -> Result<Leaf, ConstructionError> {
                    match text.parse::<$ty>() {
                        Ok(value) => Ok(Leaf::$variant(value)),
                        Err(_) => Err(ConstructionError::new(
                            $tag,
                            text,
                            concat!("not a valid `", stringify!($ty), "`"),
                        )),
                    }
                }

                fn render<'a>(&self, leaf: &'a Leaf) -> Result<Cow<'a, str>, ConstructionError> {
                    match leaf {
                        Leaf::$variant(value) => Ok(Cow::Owned(value.to_string())),
                        other => Err(render_mismatch($tag, other)),
                    }
                }
            }
        )*
    };
}

numeric_factory! {
    /// Factory for the `Byte` tag.
    ByteFactory, tag::BYTE, Byte, i8;
    /// Factory for the `Short` tag.
    ShortFactory, tag::SHORT, Short, i16;
    /// Factory for the `Integer` tag.
    IntegerFactory, tag::INTEGER, Int, i32;
    /// Factory for the `Long` tag.
    LongFactory, tag::LONG, Long, i64;
    /// Factory for the `Float` tag.
    FloatFactory, tag::FLOAT, Float, f32;
    /// Factory for the `Double` tag.
    DoubleFactory, tag::DOUBLE, Double, f64;
}

// -----------------------------------------------------------------------------
// BooleanFactory

/// Factory for the `Boolean` tag. Accepts exactly `true` and `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanFactory;

impl LeafFactory for BooleanFactory {
    fn tag(&self) -> &str {
        tag::BOOLEAN
    }

    fn construct(&self, text: &str) -> Result<Leaf, ConstructionError> {
        match text {
            "true" => Ok(Leaf::Bool(true)),
            "false" => Ok(Leaf::Bool(false)),
            _ => Err(ConstructionError::new(
                tag::BOOLEAN,
                text,
                "expected `true` or `false`",
            )),
        }
    }

    fn render<'a>(&self, leaf: &'a Leaf) -> Result<Cow<'a, str>, ConstructionError> {
        match leaf {
            Leaf::Bool(value) => Ok(Cow::Borrowed(if *value { "true" } else { "false" })),
            other => Err(render_mismatch(tag::BOOLEAN, other)),
        }
    }
}

// -----------------------------------------------------------------------------
// CharacterFactory

/// Factory for the `Character` tag. Accepts exactly one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterFactory;

impl LeafFactory for CharacterFactory {
    fn tag(&self) -> &str {
        tag::CHARACTER
    }

    fn construct(&self, text: &str) -> Result<Leaf, ConstructionError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Leaf::Char(c)),
            _ => Err(ConstructionError::new(
                tag::CHARACTER,
                text,
                "expected exactly one character",
            )),
        }
    }

    fn render<'a>(&self, leaf: &'a Leaf) -> Result<Cow<'a, str>, ConstructionError> {
        match leaf {
            Leaf::Char(value) => Ok(Cow::Owned(value.to_string())),
            other => Err(render_mismatch(tag::CHARACTER, other)),
        }
    }
}

// -----------------------------------------------------------------------------
// StringFactory

/// Factory for the `String` tag. Text passes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFactory;

impl LeafFactory for StringFactory {
    fn tag(&self) -> &str {
        tag::STRING
    }

    fn construct(&self, text: &str) -> Result<Leaf, ConstructionError> {
        Ok(Leaf::Str(text.to_owned()))
    }

    fn render<'a>(&self, leaf: &'a Leaf) -> Result<Cow<'a, str>, ConstructionError> {
        match leaf {
            Leaf::Str(value) => Ok(Cow::Borrowed(value.as_str())),
            other => Err(render_mismatch(tag::STRING, other)),
        }
    }
}

// -----------------------------------------------------------------------------
// The built-in set

/// All nine built-in factories, in registration order.
pub fn builtin_factories() -> Vec<Box<dyn LeafFactory>> {
    vec![
        Box::new(BooleanFactory),
        Box::new(ByteFactory),
        Box::new(ShortFactory),
        Box::new(IntegerFactory),
        Box::new(LongFactory),
        Box::new(FloatFactory),
        Box::new(DoubleFactory),
        Box::new(CharacterFactory),
        Box::new(StringFactory),
    ]
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trip() {
        let factory = IntegerFactory;
        let leaf = factory.construct("42").unwrap();
        assert_eq!(leaf, Leaf::Int(42));
        assert_eq!(factory.render(&leaf).unwrap(), "42");
    }

    #[test]
    fn integer_rejects_garbage() {
        let err = IntegerFactory.construct("forty-two").unwrap_err();
        assert_eq!(err.tag(), "Integer");
        assert_eq!(err.data(), "forty-two");
    }

    #[test]
    fn boolean_is_strict() {
        assert_eq!(BooleanFactory.construct("true").unwrap(), Leaf::Bool(true));
        assert!(BooleanFactory.construct("TRUE").is_err());
        assert!(BooleanFactory.construct("1").is_err());
    }

    #[test]
    fn character_wants_one_char() {
        assert_eq!(CharacterFactory.construct("e").unwrap(), Leaf::Char('e'));
        assert!(CharacterFactory.construct("").is_err());
        assert!(CharacterFactory.construct("ab").is_err());
    }

    #[test]
    fn string_keeps_whitespace() {
        let leaf = StringFactory.construct("  padded  ").unwrap();
        assert_eq!(StringFactory.render(&leaf).unwrap(), "  padded  ");
    }

    #[test]
    fn render_rejects_mismatched_leaf() {
        assert!(IntegerFactory.render(&Leaf::Long(1)).is_err());
        assert!(StringFactory.render(&Leaf::Int(1)).is_err());
    }
}
