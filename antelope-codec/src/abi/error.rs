use hex::FromHexError;
use serde_json::{
    Error as JsonError,
    Value as JsonValue,
};
use snafu::Snafu;

use antelope_codec_macros::with_location;

use crate::{InvalidValue, impl_auto_error_conversion, SerializeError};

#[with_location]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ABIError {
    #[snafu(display("cannot deserialize {what} from stream"))]
    DeserializeError { what: String, source: SerializeError },

    #[snafu(display(r#"unsupported ABI version: "{version}""#))]
    VersionError { version: String },

    #[snafu(display(r#"incompatible versions: "{a}" vs. "{b}""#))]
    IncompatibleVersionError { a: String, b: String },

    #[snafu(display("integrity error: {message}"))]
    IntegrityError { message: String },

    #[snafu(display("encode error: {message}"))]
    EncodeError { message: String },

    #[snafu(display("decode error: {message}"))]
    DecodeError { message: String },

    #[snafu(display("cannot deserialize ABIDefinition from JSON"))]
    JsonError { source: JsonError },

    #[snafu(display("cannot decode hex representation for hex ABI"))]
    HexABIError { source: FromHexError },

    #[snafu(display("unknown ABI with name: '{name}'"))]
    UnknownABIError { name: String },

    #[snafu(display("cannot convert variant to AntelopeValue: {v}"))]
    VariantConversionError { v: Box<JsonValue>, source: InvalidValue },

    #[snafu(display(r#"cannot convert given variant {value} to Antelope type "{typename}""#))]
    IncompatibleVariantTypes {
        typename: String,
        value: Box<JsonValue>,
    },

    // -----------------------------------------------------------------------------
    //     Type-graph construction errors (see spec.md section 7)
    // -----------------------------------------------------------------------------

    #[snafu(display(r#"type name cannot be resolved: "{type_name}""#))]
    UnknownType { type_name: String },

    #[snafu(display("schema entry is missing a required name"))]
    MissingName,

    #[snafu(display(r#"type "{type_name}" is defined more than once"#))]
    RedefinedType { type_name: String },

    #[snafu(display(r#"base "{base}" of struct "{struct_name}" does not resolve to a struct"#))]
    BaseNotAStruct { struct_name: String, base: String },

    #[snafu(display(r#"type "{type_name}" has a forbidden nesting of composite shapes"#))]
    InvalidNesting { type_name: String },

    #[snafu(display(r#""$" used in a disallowed position for type "{type_name}""#))]
    ExtensionTypedef { type_name: String },

    #[snafu(display("recursion limit reached while processing type \"{type_name}\""))]
    RecursionLimitReached { type_name: String },

    #[snafu(display("malformed ABI schema: {message}"))]
    BadAbi { message: String },

    #[snafu(display("malformed wire or JSON payload: {message}"))]
    BadData { message: String },
}

impl_auto_error_conversion!(FromHexError, ABIError, HexABISnafu);
impl_auto_error_conversion!(JsonError, ABIError, JsonSnafu);
