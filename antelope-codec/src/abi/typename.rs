use std::fmt;

use crate::AntelopeType;


/// Newtype wrapper for a `&str` representing a type name that adds a few
/// convenience methods to parse the suffix grammar used by ABI type names:
/// `T`, `T?`, `T[]`, `T[N]`, and a trailing `$` marking a binary extension
/// field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName<'a>(pub &'a str);

impl<'a> TypeName<'a> {
    pub fn is_array(&self) -> bool {
        self.0.ends_with("[]")
    }

    pub fn is_sized_array(&self) -> bool {
        match (self.0.rfind('['), self.0.rfind(']')) {
            (Some(pos1), Some(pos2)) => {
                if pos1 + 1 < pos2 {
                    self.0[pos1 + 1..pos2].chars().all(|c| c.is_ascii_digit())
                }
                else {
                    false
                }
            },
            _ => false,
        }
    }

    /// Return the declared size of a sized array type (e.g.: `"int8[4]"` -> `Some(4)`),
    /// or `None` if this isn't a sized array.
    pub fn array_size(&self) -> Option<usize> {
        if !self.is_sized_array() { return None; }
        let pos1 = self.0.rfind('[')?;
        let pos2 = self.0.rfind(']')?;
        self.0[pos1 + 1..pos2].parse().ok()
    }

    pub fn is_optional(&self) -> bool {
        self.0.ends_with('?')
    }

    pub fn is_integer(&self) -> bool {
        self.0.starts_with("int") || self.0.starts_with("uint")
    }

    /// Return the fundamental type for the given type, ie: the type with a
    /// special designator (?/optional, []/array, [N]/sized array) removed.
    ///
    /// Note that this doesn't work recursively and only works by removing the
    /// last suffix; if you want the base type you have to call this method
    /// recursively yourself.
    ///
    /// ## Examples
    ///
    /// ```
    /// # use antelope_codec::abi::TypeName;
    /// assert_eq!(TypeName("int8"), TypeName("int8"));
    /// assert_eq!(TypeName("int8[]"), TypeName("int8"));
    /// assert_eq!(TypeName("int8[4]"), TypeName("int8"));
    /// assert_eq!(TypeName("int8[][]"), TypeName("int8[]"));
    /// assert_eq!(TypeName("int8[][]?"), TypeName("int8[][]"));
    /// ```
    pub fn fundamental_type(&self) -> TypeName<'a> {
        if self.is_array() {
            TypeName(&self.0[..self.0.len() - 2])
        }
        else if self.is_sized_array() {
            TypeName(&self.0[..self.0.rfind('[').unwrap()])  // safe unwrap
        }
        else if self.is_optional() {
            TypeName(&self.0[..self.0.len() - 1])
        }
        else {
            *self
        }
    }

    pub fn has_bin_extension(&self) -> bool {
        self.0.ends_with('$')
    }

    /// `byte` and `char` are not builtin [`AntelopeType`](crate::AntelopeType)
    /// variants of their own; they name `uint8` for the purpose of resolving
    /// the element type of a sized array (spec.md §4.1). Anywhere else this
    /// just returns the atom unchanged.
    pub fn builtin_name(&self) -> &'a str {
        match self.0 {
            "byte" | "char" => "uint8",
            other => other,
        }
    }

    /// Whether this atom is the `byte`/`char` element-type spelling that
    /// makes a sized array encode as a hex-blob rather than a JSON array of
    /// numbers (spec.md §4.1, §4.3).
    pub fn is_byte_like(&self) -> bool {
        matches!(self.0, "byte" | "char")
    }

    pub fn remove_bin_extension(&self) -> TypeName<'a> {
        if self.0.ends_with('$') {
            TypeName(&self.0[..self.0.len()-1])
        }
        else {
            *self
        }
    }
}

impl fmt::Debug for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'a> From<&'a String> for TypeName<'a> {
    fn from(t: &'a String) -> TypeName<'a> {
        TypeName(t.as_str())
    }
}

impl<'a> From<&'a str> for TypeName<'a> {
    fn from(t: &'a str) -> TypeName<'a> {
        TypeName(t)
    }
}

impl<'a> From<TypeName<'a>> for &'a str {
    fn from(t: TypeName<'a>) -> &'a str {
        t.0
    }
}

impl<'a> TryFrom<TypeName<'a>> for AntelopeType {
    type Error = strum::ParseError;

    fn try_from(value: TypeName<'a>) -> Result<Self, Self::Error> {
        AntelopeType::try_from(value.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_grammar() {
        assert!(TypeName("int8[]").is_array());
        assert!(!TypeName("int8[]").is_sized_array());
        assert!(TypeName("int8[4]").is_sized_array());
        assert_eq!(TypeName("int8[4]").array_size(), Some(4));
        assert_eq!(TypeName("int8[]").array_size(), None);
        assert!(TypeName("int8?").is_optional());
        assert!(TypeName("int8$").has_bin_extension());
        assert_eq!(TypeName("int8$").remove_bin_extension(), TypeName("int8"));
    }

    #[test]
    fn fundamental_type() {
        assert_eq!(TypeName("int8").fundamental_type(), TypeName("int8"));
        assert_eq!(TypeName("int8[]").fundamental_type(), TypeName("int8"));
        assert_eq!(TypeName("int8[4]").fundamental_type(), TypeName("int8"));
        assert_eq!(TypeName("int8[][]").fundamental_type(), TypeName("int8[]"));
        assert_eq!(TypeName("int8[][]?").fundamental_type(), TypeName("int8[][]"));
    }
}
