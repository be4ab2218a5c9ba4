//! Provide declared property metadata for bean classes.

use og_graph::Value;

use crate::access::{ReflectionError, ReflectionErrorKind};

// -----------------------------------------------------------------------------
// PropertyDef

/// One declared property of a bean class.
///
/// The declared type tag is what lets a leaf-typed property travel as
/// bare text on the wire, and the nullability flag is what lets the
/// parser refuse a null for a primitive-typed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    name: String,
    ty: String,
    nullable: bool,
}

impl PropertyDef {
    /// The property name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type tag.
    #[inline]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Whether this property may hold an explicit null.
    #[inline]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }
}

// -----------------------------------------------------------------------------
// BeanDef

/// The declared shape of one bean class.
///
/// Registration gives a bean class three things: a stable property
/// order for serialization, declared type tags so leaf-typed
/// properties can be written as bare text, and nullability so a null
/// is refused where the underlying type cannot hold one.
///
/// # Examples
///
/// ```
/// use og_graph::tag;
/// use og_reflect::registry::BeanDef;
///
/// let def = BeanDef::new("Person")
///     .with_property("name", tag::STRING)
///     .with_primitive("age", tag::INTEGER)
///     .with_property("partner", "Person");
///
/// assert_eq!(def.property("age").unwrap().nullable(), false);
/// assert_eq!(def.property("partner").unwrap().ty(), "Person");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDef {
    class: String,
    properties: Vec<PropertyDef>,
}

impl BeanDef {
    /// Creates a definition for the given class, with no properties.
    #[inline]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: Vec::new(),
        }
    }

    /// Declares a nullable property. Declaration order is the
    /// serialization order.
    pub fn with_property(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            ty: ty.into(),
            nullable: true,
        });
        self
    }

    /// Declares a primitive-typed property, which cannot hold null.
    pub fn with_primitive(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.properties.push(PropertyDef {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
        });
        self
    }

    /// The bean class this definition describes.
    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The declared properties, in declaration order.
    #[inline]
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &PropertyDef> {
        self.properties.iter()
    }

    /// The number of declared properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Checks that `value` may be assigned into the named property.
    ///
    /// Fails with [`ReflectionError`] when the property is not
    /// declared, or when the value is null and the property cannot
    /// hold one.
    pub fn check_assignable(&self, name: &str, value: &Value) -> Result<(), ReflectionError> {
        let Some(property) = self.property(name) else {
            return Err(ReflectionError::new(
                name.to_owned(),
                ReflectionErrorKind::NoSuchProperty {
                    class: self.class.clone(),
                },
            ));
        };
        if value.is_null() && !property.nullable {
            return Err(ReflectionError::new(
                name.to_owned(),
                ReflectionErrorKind::NotNullable {
                    class: self.class.clone(),
                },
            ));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use og_graph::tag;

    fn person() -> BeanDef {
        BeanDef::new("Person")
            .with_property("name", tag::STRING)
            .with_primitive("age", tag::INTEGER)
    }

    #[test]
    fn declaration_order_is_kept() {
        let names: Vec<_> = person().properties().map(|p| p.name().to_owned()).collect();
        assert_eq!(names, ["name", "age"]);
    }

    #[test]
    fn null_refused_for_primitive() {
        let def = person();
        assert!(def.check_assignable("name", &Value::Null).is_ok());
        assert!(def.check_assignable("age", &Value::Null).is_err());
        assert!(def.check_assignable("age", &Value::leaf(5_i32)).is_ok());
    }

    #[test]
    fn unknown_property_is_an_error() {
        let err = person()
            .check_assignable("shoe_size", &Value::Null)
            .unwrap_err();
        assert_eq!(err.segment(), "shoe_size");
    }
}
