//! The validated ABI type graph plus the composite (de)serializers that walk
//! it. See `definition.rs` for the schema document this is built from.

use std::collections::HashMap;

use serde_json::{json, Map as JsonMap, Value as JsonValue};
use snafu::ensure;
use strum::VariantNames;
use tracing::{debug, instrument};

use crate::{
    config::DEFAULT_RECURSION_LIMIT,
    types::{AntelopeType, AntelopeValue, Name, VarUint32},
    abi::typename::TypeName,
    abi::definition::{ABIDefinition, Struct, Variant},
    abi::error::{
        ABIError, UnknownTypeSnafu, MissingNameSnafu, RedefinedTypeSnafu, BaseNotAStructSnafu,
        InvalidNestingSnafu, RecursionLimitReachedSnafu, BadDataSnafu,
        VariantConversionSnafu, HexABISnafu, DeserializeSnafu,
    },
    ByteStream, ABISerializable,
};

type Result<T, E = ABIError> = core::result::Result<T, E>;


/// A validated, immutable ABI type graph built from an [`ABIDefinition`].
///
/// Construction resolves every referenced type name, rejects cycles and
/// duplicate definitions, and pre-computes the lookup tables used by the
/// codec entry points (`bin_to_json`, `json_to_bin`, ...).
#[derive(Default, Clone, Debug)]
pub struct ABI {
    typedefs: HashMap<String, String>,
    structs: HashMap<String, Struct>,
    actions: HashMap<Name, String>,
    tables: HashMap<Name, String>,
    variants: HashMap<String, Variant>,
    action_results: HashMap<Name, String>,

    /// table_name -> row type
    kv_tables: HashMap<Name, String>,
    /// table_name -> name of the field that is the primary index
    kv_table_primary_key_name: HashMap<Name, String>,

    recursion_limit: u32,
}


impl ABI {
    pub fn new() -> Self {
        Self { recursion_limit: DEFAULT_RECURSION_LIMIT, ..Default::default() }
    }

    // -----------------------------------------------------------------------------
    //     Constructors and validation
    // -----------------------------------------------------------------------------

    pub fn from_definition(abi: &ABIDefinition) -> Result<Self> {
        let mut result = Self::new();
        result.set_abi(abi)?;
        Ok(result)
    }

    pub fn from_str(abi: &str) -> Result<Self> {
        Self::from_definition(&ABIDefinition::from_str(abi)?)
    }

    /// `abi::from_json`
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_str(text)
    }

    pub fn from_hex_abi(abi: &str) -> Result<Self> {
        Self::from_bin_abi(&hex::decode(abi).context(HexABISnafu)?)
    }

    pub fn from_bin_abi(abi: &[u8]) -> Result<Self> {
        let mut data = ByteStream::from(abi.to_owned());
        let abi_def = ABIDefinition::from_bin(&mut data)?;
        Self::from_definition(&abi_def)
    }

    /// `abi::from_binary`
    pub fn from_binary(bytes: &[u8]) -> Result<Self> {
        Self::from_bin_abi(bytes)
    }

    fn set_abi(&mut self, abi: &ABIDefinition) -> Result<()> {
        ensure!(abi.version.starts_with("eosio::abi/1."),
                crate::abi::error::VersionSnafu { version: &abi.version });

        self.typedefs.clear();
        self.structs.clear();
        self.actions.clear();
        self.tables.clear();
        self.variants.clear();
        self.action_results.clear();
        self.kv_tables.clear();
        self.kv_table_primary_key_name.clear();

        self.structs.extend(abi.structs.iter().map(|s| (s.name.clone(), s.clone())));

        for td in &abi.types {
            ensure!(!td.new_type_name.is_empty(), MissingNameSnafu);
            ensure!(!self.typedefs.contains_key(&td.new_type_name) && !self.structs.contains_key(&td.new_type_name),
                    RedefinedTypeSnafu { type_name: td.new_type_name.clone() });
            self.typedefs.insert(td.new_type_name.clone(), td.type_.clone());
        }

        self.actions.extend(abi.actions.iter().map(|a| (a.name, a.type_.clone())));
        self.tables.extend(abi.tables.iter().map(|t| (t.name, t.type_.clone())));
        self.variants.extend(abi.variants.iter().map(|v| (v.name.clone(), v.clone())));
        self.action_results.extend(abi.action_results.iter().map(|a| (a.name, a.result_type.clone())));

        for (name, entry) in &abi.kv_tables {
            self.kv_tables.insert(*name, entry.type_.clone());
            self.kv_table_primary_key_name.insert(*name, entry.primary_index.name.clone());
        }

        ensure!(self.typedefs.len() == abi.types.len(),
                RedefinedTypeSnafu { type_name: "(duplicate type definition)".to_owned() });
        ensure!(self.structs.len() == abi.structs.len(),
                RedefinedTypeSnafu { type_name: "(duplicate struct definition)".to_owned() });
        ensure!(self.variants.len() == abi.variants.len(),
                RedefinedTypeSnafu { type_name: "(duplicate variant definition)".to_owned() });

        self.validate()
    }

    /// Whether `t` resolves to a known type (builtin, alias, struct or variant).
    pub fn is_type(&self, t: TypeName) -> bool {
        let mut t = t;
        let mut ft = t.fundamental_type();
        while ft != t {
            t = ft;
            ft = t.fundamental_type();
        }

        AntelopeType::VARIANTS.contains(&t.builtin_name())
            || (self.typedefs.contains_key(t.0) && self.is_type(TypeName(self.typedefs.get(t.0).unwrap())))
            || self.structs.contains_key(t.0)
            || self.variants.contains_key(t.0)
    }

    /// Follow the alias chain until reaching a type that is not itself an alias.
    pub fn resolve_type<'a>(&'a self, t: TypeName<'a>) -> TypeName<'a> {
        let mut rtype = t;
        loop {
            match self.typedefs.get(rtype.0) {
                Some(target) => rtype = TypeName(target),
                None => return rtype,
            }
        }
    }

    fn validate(&self) -> Result<()> {
        // no cycles in the alias chain
        for (name, target) in &self.typedefs {
            let mut seen = vec![name.as_str(), target.as_str()];
            let mut cursor = self.typedefs.get(target.as_str());
            while let Some(next) = cursor {
                ensure!(!seen.contains(&next.as_str()),
                        RedefinedTypeSnafu { type_name: format!("cyclic alias: {name}") });
                seen.push(next);
                cursor = self.typedefs.get(next);
            }
        }

        // every alias target resolves to a known type
        for (name, target) in &self.typedefs {
            ensure!(self.is_type(TypeName(target)),
                    UnknownTypeSnafu { type_name: format!("{name} -> {target}") });
            self.check_nesting(target)?;
        }

        // no cycles in struct bases, and every base resolves to a struct
        for s in self.structs.values() {
            if !s.base.is_empty() {
                let mut current = s;
                let mut seen = vec![&current.name];
                while !current.base.is_empty() {
                    let base = self.structs.get(&current.base)
                        .context(BaseNotAStructSnafu { struct_name: s.name.clone(), base: current.base.clone() })?;
                    ensure!(!seen.contains(&&base.name),
                            RedefinedTypeSnafu { type_name: format!("cyclic base chain from {}", s.name) });
                    seen.push(&base.name);
                    current = base;
                }
            }

            for field in &s.fields {
                self.check_nesting(&field.type_)?;
                ensure!(self.is_type(TypeName(&field.type_).remove_bin_extension()),
                        UnknownTypeSnafu { type_name: format!("{}::{}: {}", s.name, field.name, field.type_) });
            }
        }

        for v in self.variants.values() {
            for t in &v.types {
                self.check_nesting(t)?;
                ensure!(self.is_type(TypeName(t)),
                        UnknownTypeSnafu { type_name: format!("{} (in variant {})", t, v.name) });
            }
        }

        for (name, type_) in self.actions.iter().chain(self.tables.iter()).chain(self.action_results.iter()) {
            ensure!(self.is_type(TypeName(type_)),
                    UnknownTypeSnafu { type_name: format!("{type_} (used by {name})") });
        }

        for (table, row_type) in &self.kv_tables {
            ensure!(self.is_type(TypeName(row_type)),
                    UnknownTypeSnafu { type_name: format!("{row_type} (kv row type for table {table})") });
        }

        Ok(())
    }

    /// Enforce invariant 5 and 6 of spec.md §3: arrays/optionals/extensions
    /// may not directly wrap another array/optional/extension, and `$` may
    /// only appear as a struct's own tail wrapper, never inside an alias.
    fn check_nesting(&self, type_name: &str) -> Result<()> {
        let tn = TypeName(type_name);

        ensure!(!tn.has_bin_extension(), crate::abi::error::ExtensionTypedefSnafu { type_name: type_name.to_owned() });

        if tn.is_array() || tn.is_sized_array() || tn.is_optional() {
            let inner = tn.fundamental_type();
            let resolved_inner = self.resolve_type(inner);
            ensure!(!resolved_inner.is_array() && !resolved_inner.is_sized_array() &&
                    !resolved_inner.is_optional() && !resolved_inner.has_bin_extension(),
                    InvalidNestingSnafu { type_name: type_name.to_owned() });
        }

        Ok(())
    }

    // -----------------------------------------------------------------------------
    //     Secondary lookups (spec.md §3/§6)
    // -----------------------------------------------------------------------------

    pub fn type_for_action(&self, name: Name) -> Option<&str> {
        self.actions.get(&name).map(String::as_str)
    }

    pub fn type_for_table(&self, name: Name) -> Option<&str> {
        self.tables.get(&name).map(String::as_str)
    }

    pub fn type_for_action_result(&self, name: Name) -> Option<&str> {
        self.action_results.get(&name).map(String::as_str)
    }

    pub fn type_for_kv_table(&self, name: Name) -> Option<&str> {
        self.kv_tables.get(&name).map(String::as_str)
    }

    pub fn kv_table_primary_key_name(&self, table: Name) -> Option<&str> {
        self.kv_table_primary_key_name.get(&table).map(String::as_str)
    }

    // -----------------------------------------------------------------------------
    //     Top-level binary <-> JSON entry points (spec.md §6)
    // -----------------------------------------------------------------------------

    #[inline]
    pub fn encode<T: ABISerializable>(&self, stream: &mut ByteStream, obj: &T) {
        obj.to_bin(stream)
    }

    pub fn bin_to_json(&self, type_name: &str, bytes: &[u8]) -> Result<String> {
        let mut ds = ByteStream::from(bytes.to_owned());
        let value = self.decode_variant(&mut ds, type_name)?;
        Ok(value.to_string())
    }

    pub fn json_to_bin(&self, type_name: &str, json_text: &str) -> Result<Vec<u8>> {
        let value: JsonValue = serde_json::from_str(json_text).context(crate::abi::error::JsonSnafu)?;
        let mut ds = ByteStream::new();
        self.encode_variant(&mut ds, type_name, &value)?;
        Ok(ds.into_bytes())
    }

    /// `abi::json_to_bin_reorderable` — same contract as [`Self::json_to_bin`]
    /// but struct object keys may arrive in any order.
    pub fn json_to_bin_reorderable(&self, type_name: &str, json_text: &str) -> Result<Vec<u8>> {
        let value: JsonValue = serde_json::from_str(json_text).context(crate::abi::error::JsonSnafu)?;
        let mut ds = ByteStream::new();
        let mut ctx = Ctx::new(self.recursion_limit, true);
        self.encode_variant_(&mut ctx, &mut ds, TypeName(type_name), &value)?;
        Ok(ds.into_bytes())
    }

    // -----------------------------------------------------------------------------
    //     JSON -> binary
    // -----------------------------------------------------------------------------

    #[inline]
    pub fn encode_variant<'a, T>(&self, ds: &mut ByteStream, typename: T, object: &JsonValue) -> Result<()>
    where T: Into<TypeName<'a>>
    {
        self.encode_variant_(&mut Ctx::new(self.recursion_limit, false), ds, typename.into(), object)
    }

    #[instrument(skip(self, ctx, ds))]
    fn encode_variant_(&self, ctx: &mut Ctx, ds: &mut ByteStream, typename: TypeName, object: &JsonValue) -> Result<()> {
        ctx.enter(typename.0)?;

        let rtype = self.resolve_type(typename);
        let ftype = rtype.fundamental_type();

        debug!(rtype = rtype.0, ftype = ftype.0);

        let incompatible_types = || BadDataSnafu {
            message: format!("cannot encode value {object} as type \"{rtype}\""),
        }.build();

        if AntelopeType::VARIANTS.contains(&ftype.builtin_name()) {
            let inner_type: AntelopeType = ftype.builtin_name().try_into().unwrap();  // safe: checked above
            if rtype.is_sized_array() && ftype.is_byte_like() {
                let n = rtype.array_size().unwrap();
                let s = object.as_str().ok_or_else(incompatible_types)?;
                ensure!(s.len() == 2 * n, BadDataSnafu {
                    message: format!("sized byte array \"{rtype}\" expects a {}-char hex string, got {}", 2 * n, s.len())
                });
                let bytes = hex::decode(s).map_err(|_| incompatible_types())?;
                ds.write_bytes(&bytes);
            }
            else if rtype.is_array() || rtype.is_sized_array() {
                let a = object.as_array().ok_or_else(incompatible_types)?;
                if let Some(n) = rtype.array_size() {
                    ensure!(a.len() == n, BadDataSnafu {
                        message: format!("sized array \"{rtype}\" expects {n} elements, got {}", a.len())
                    });
                }
                else {
                    VarUint32(a.len() as u32).to_bin(ds);
                }
                for v in a {
                    AntelopeValue::from_variant(inner_type, v)
                        .context(VariantConversionSnafu { v: Box::new(v.clone()) })?
                        .to_bin(ds);
                }
            }
            else if rtype.is_optional() {
                match !object.is_null() {
                    true => {
                        true.to_bin(ds);
                        AntelopeValue::from_variant(inner_type, object)
                            .context(VariantConversionSnafu { v: Box::new(object.clone()) })?
                            .to_bin(ds);
                    },
                    false => false.to_bin(ds),
                }
            }
            else {
                AntelopeValue::from_variant(inner_type, object)
                    .context(VariantConversionSnafu { v: Box::new(object.clone()) })?
                    .to_bin(ds);
            }
        }
        else if rtype.is_array() || rtype.is_sized_array() {
            let a = object.as_array().ok_or_else(incompatible_types)?;
            if let Some(n) = rtype.array_size() {
                ensure!(a.len() == n, BadDataSnafu {
                    message: format!("sized array \"{rtype}\" expects {n} elements, got {}", a.len())
                });
            }
            else {
                VarUint32(a.len() as u32).to_bin(ds);
            }
            for v in a {
                self.encode_variant_(ctx, ds, ftype, v)?;
            }
        }
        else if rtype.is_optional() {
            match !object.is_null() {
                true => {
                    true.to_bin(ds);
                    self.encode_variant_(ctx, ds, ftype, object)?;
                },
                false => false.to_bin(ds),
            }
        }
        else if let Some(variant_def) = self.variants.get(rtype.0) {
            ensure!(object.is_array() && object.as_array().unwrap().len() == 2,
                    BadDataSnafu { message: format!("expected a 2-element array to encode variant \"{rtype}\": {object}") });
            let tag_name = object[0].as_str().ok_or_else(incompatible_types)?;
            let vpos = variant_def.types.iter().position(|v| v == tag_name)
                .ok_or_else(|| BadDataSnafu { message: format!("\"{tag_name}\" is not a member of variant \"{rtype}\"") }.build())?;
            VarUint32(vpos as u32).to_bin(ds);
            self.encode_variant_(ctx, ds, TypeName(tag_name), &object[1])?;
        }
        else if let Some(struct_def) = self.structs.get(rtype.0).cloned() {
            if ctx.reorderable {
                self.encode_struct_reorderable(ctx, ds, &struct_def, object)?;
            }
            else {
                self.encode_struct(ctx, ds, &struct_def, object)?;
            }
        }
        else {
            return UnknownTypeSnafu { type_name: rtype.0.to_owned() }.fail();
        }

        ctx.exit();
        Ok(())
    }

    fn encode_struct(&self, ctx: &mut Ctx, ds: &mut ByteStream, struct_def: &Struct, object: &JsonValue) -> Result<()> {
        let obj = object.as_object().ok_or_else(|| BadDataSnafu {
            message: format!("expected a JSON object to encode struct \"{}\"", struct_def.name)
        }.build())?;

        if !struct_def.base.is_empty() {
            let base_allow = ctx.allow_extensions;
            ctx.allow_extensions = false;
            self.encode_variant_(ctx, ds, TypeName(&struct_def.base), object)?;
            ctx.allow_extensions = base_allow;
        }

        // strict path (spec.md §4.3): keys must arrive in declaration order,
        // with no unknown or duplicate keys. `obj` preserves JSON text order
        // (serde_json's `preserve_order` feature), so a single forward pass
        // over its keys is enough to catch both violations.
        let mut last_index = None;
        for key in obj.keys() {
            let pos = struct_def.fields.iter().position(|f| &f.name == key).ok_or_else(|| BadDataSnafu {
                message: format!("unknown field '{key}' while encoding struct '{}'", struct_def.name)
            }.build())?;
            if let Some(last) = last_index {
                ensure!(pos > last, BadDataSnafu {
                    message: format!("field '{key}' out of declaration order while encoding struct '{}'", struct_def.name)
                });
            }
            last_index = Some(pos);
        }

        // whether *this* struct is allowed to have a binary-extension tail at
        // all is inherited from the caller (e.g. a base struct embedded in a
        // derived one never gets to omit extensions); snapshot it once so the
        // per-field loop below can't clobber it before the extension check at
        // the bottom of the loop sees it.
        let inherited_allow_extensions = ctx.allow_extensions;

        let mut allow_additional_fields = true;
        let nfields = struct_def.fields.len();
        for (i, field) in struct_def.fields.iter().enumerate() {
            let ftype = TypeName(&field.type_);
            let present = obj.contains_key(&field.name);

            if present || ftype.is_optional() {
                ensure!(allow_additional_fields, BadDataSnafu {
                    message: format!("unexpected field '{}' while encoding struct '{}'", field.name, struct_def.name)
                });
                let value = if present { &obj[&field.name] } else { &JsonValue::Null };
                ctx.allow_extensions = i == nfields - 1 && inherited_allow_extensions;
                self.encode_variant_(ctx, ds, ftype.remove_bin_extension(), value)?;
            }
            else if ftype.has_bin_extension() && inherited_allow_extensions {
                allow_additional_fields = false;
            }
            else if !allow_additional_fields {
                return BadDataSnafu {
                    message: format!("field '{}' without binary extension designation in struct '{}'", field.name, struct_def.name)
                }.fail();
            }
            else {
                return BadDataSnafu {
                    message: format!("missing field '{}' while encoding struct '{}'", field.name, struct_def.name)
                }.fail();
            }
        }
        ctx.allow_extensions = inherited_allow_extensions;
        Ok(())
    }

    /// Reorderable JSON-to-binary: buffer one field at a time into its
    /// declaration-order slot, then concatenate in order (spec.md §4.4, §9).
    fn encode_struct_reorderable(&self, ctx: &mut Ctx, ds: &mut ByteStream, struct_def: &Struct, object: &JsonValue) -> Result<()> {
        let obj = object.as_object().ok_or_else(|| BadDataSnafu {
            message: format!("expected a JSON object to encode struct \"{}\"", struct_def.name)
        }.build())?;

        let mut base_bytes = Vec::new();
        if !struct_def.base.is_empty() {
            let mut base_ds = ByteStream::new();
            let base_allow = ctx.allow_extensions;
            ctx.allow_extensions = false;
            self.encode_variant_(ctx, &mut base_ds, TypeName(&struct_def.base), object)?;
            ctx.allow_extensions = base_allow;
            base_bytes = base_ds.into_bytes();
        }

        let known: std::collections::HashSet<&str> = struct_def.fields.iter().map(|f| f.name.as_str()).collect();
        for key in obj.keys() {
            ensure!(known.contains(key.as_str()), BadDataSnafu {
                message: format!("unknown field '{key}' while encoding struct '{}'", struct_def.name)
            });
        }

        let nfields = struct_def.fields.len();
        let mut slots: Vec<Option<Vec<u8>>> = vec![None; nfields];
        let mut extensions_disabled_from = nfields;

        for (i, field) in struct_def.fields.iter().enumerate() {
            let ftype = TypeName(&field.type_);
            let present = obj.contains_key(&field.name);

            if present {
                let mut slot_ds = ByteStream::new();
                ctx.allow_extensions = i == nfields - 1;
                self.encode_variant_(ctx, &mut slot_ds, ftype.remove_bin_extension(), &obj[&field.name])?;
                slots[i] = Some(slot_ds.into_bytes());
            }
            else if ftype.has_bin_extension() {
                extensions_disabled_from = extensions_disabled_from.min(i);
            }
            else {
                return BadDataSnafu {
                    message: format!("missing field '{}' while encoding struct '{}'", field.name, struct_def.name)
                }.fail();
            }
        }

        ds.write_bytes(&base_bytes);
        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(bytes) if i < extensions_disabled_from => ds.write_bytes(&bytes),
                Some(_) => return BadDataSnafu {
                    message: format!("extension field present after an earlier absent extension in struct '{}'", struct_def.name)
                }.fail(),
                None => break,
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------------
    //     Binary -> JSON
    // -----------------------------------------------------------------------------

    #[inline]
    pub fn decode_variant<'a, T>(&self, ds: &mut ByteStream, typename: T) -> Result<JsonValue>
    where T: Into<TypeName<'a>>
    {
        self.decode_variant_(&mut Ctx::new(self.recursion_limit, false), ds, typename.into())
    }

    #[allow(clippy::collapsible_else_if)]
    fn decode_variant_(&self, ctx: &mut Ctx, ds: &mut ByteStream, typename: TypeName) -> Result<JsonValue> {
        ctx.enter(typename.0)?;

        let rtype = self.resolve_type(typename);
        let ftype = rtype.fundamental_type();

        let result = if AntelopeType::VARIANTS.contains(&ftype.builtin_name()) {
            let type_: AntelopeType = ftype.builtin_name().try_into().unwrap();  // safe: checked above

            if rtype.is_sized_array() && ftype.is_byte_like() {
                let n = rtype.array_size().unwrap();
                let bytes = ds.read_bytes(n)
                    .map_err(crate::abiserializable::SerializeError::from)
                    .context(DeserializeSnafu { what: "sized byte array" })?;
                JsonValue::String(hex::encode(bytes))
            }
            else if rtype.is_array() || rtype.is_sized_array() {
                let item_count = match rtype.array_size() {
                    Some(n) => n,
                    None => decode_usize(ds, "item_count (as varuint32)")?,
                };
                let mut a = Vec::with_capacity(item_count.min(1024));
                for _ in 0..item_count {
                    a.push(read_value(ds, type_, "array item")?);
                }
                JsonValue::Array(a)
            }
            else if rtype.is_optional() {
                match bool::from_bin(ds).context(DeserializeSnafu { what: "optional discriminant" })? {
                    true => read_value(ds, type_, "optional value")?,
                    false => JsonValue::Null,
                }
            }
            else {
                read_value(ds, type_, "single value")?
            }
        }
        else {
            if rtype.is_array() || rtype.is_sized_array() {
                let item_count = match rtype.array_size() {
                    Some(n) => n,
                    None => decode_usize(ds, "item_count (as varuint32)")?,
                };
                let mut a = Vec::with_capacity(item_count.min(1024));
                for _ in 0..item_count {
                    a.push(self.decode_variant_(ctx, ds, ftype)?);
                }
                JsonValue::Array(a)
            }
            else if rtype.is_optional() {
                match bool::from_bin(ds).context(DeserializeSnafu { what: "optional discriminant" })? {
                    true => self.decode_variant_(ctx, ds, ftype)?,
                    false => JsonValue::Null,
                }
            }
            else if let Some(variant_def) = self.variants.get(rtype.0) {
                let tag: usize = decode_usize(ds, "variant tag (as varuint32)")?;
                ensure!(tag < variant_def.types.len(),
                        BadDataSnafu { message: format!("invalid tag {tag} for variant \"{rtype}\"") });
                let variant_type = TypeName(&variant_def.types[tag]);
                json!([variant_type.0, self.decode_variant_(ctx, ds, variant_type)?])
            }
            else if let Some(struct_def) = self.structs.get(rtype.0).cloned() {
                self.decode_struct(ctx, ds, &struct_def)?
            }
            else {
                return UnknownTypeSnafu { type_name: rtype.0.to_owned() }.fail();
            }
        };

        ctx.exit();
        Ok(result)
    }

    fn decode_struct(&self, ctx: &mut Ctx, ds: &mut ByteStream, struct_def: &Struct) -> Result<JsonValue> {
        let mut result: JsonMap<String, JsonValue> = JsonMap::new();

        if !struct_def.base.is_empty() {
            let base_def = self.structs.get(&struct_def.base).cloned()
                .context(BaseNotAStructSnafu { struct_name: struct_def.name.clone(), base: struct_def.base.clone() })?;
            let mut base = self.decode_struct(ctx, ds, &base_def)?;
            result.append(base.as_object_mut().unwrap());
        }

        let mut encountered_extension = false;
        for field in &struct_def.fields {
            let ftype = TypeName(&field.type_);
            encountered_extension |= ftype.has_bin_extension();

            if ds.leftover().is_empty() {
                if ftype.has_bin_extension() { continue; }

                ensure!(!encountered_extension, BadDataSnafu {
                    message: format!("field '{}' without binary extension designation in struct '{}'", field.name, struct_def.name)
                });
                return BadDataSnafu {
                    message: format!("stream ended while decoding field '{}' of struct '{}'", field.name, struct_def.name)
                }.fail();
            }

            let rtype = self.resolve_type(ftype.remove_bin_extension());
            let value = self.decode_variant_(ctx, ds, rtype)?;
            result.insert(field.name.clone(), value);
        }
        Ok(JsonValue::Object(result))
    }

    // -----------------------------------------------------------------------------
    //     KV key codec entry point (spec.md §4.5/§6)
    // -----------------------------------------------------------------------------

    /// `abi::kv_primary_index_to_json` — returns the empty string when the
    /// key's declared index is not the table's primary index.
    pub fn kv_primary_index_to_json(&self, key_bytes: &[u8], value_bytes: &[u8]) -> Result<String> {
        crate::kv::kv_table_primary_index_to_json(self, key_bytes, value_bytes)
    }

    pub(crate) fn kv_tables(&self) -> &HashMap<Name, String> {
        &self.kv_tables
    }

    pub(crate) fn kv_table_primary_key_names(&self) -> &HashMap<Name, String> {
        &self.kv_table_primary_key_name
    }
}


/// Per-call state threaded through the recursive composite (de)serializers:
/// whether trailing struct extension fields are still allowed, and the depth
/// counter enforcing the recursion cap (spec.md §3 invariant 7, §5).
struct Ctx {
    allow_extensions: bool,
    reorderable: bool,
    depth: u32,
    limit: u32,
}

impl Ctx {
    fn new(limit: u32, reorderable: bool) -> Self {
        Ctx { allow_extensions: true, reorderable, depth: 0, limit }
    }

    fn enter(&mut self, type_name: &str) -> Result<()> {
        self.depth += 1;
        ensure!(self.depth <= self.limit, RecursionLimitReachedSnafu { type_name: type_name.to_owned() });
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }
}


fn read_value(stream: &mut ByteStream, type_: AntelopeType, what: &str) -> Result<JsonValue> {
    Ok(AntelopeValue::from_bin(type_, stream).context(DeserializeSnafu { what })?.to_variant())
}

fn decode_usize(stream: &mut ByteStream, what: &str) -> Result<usize> {
    Ok(VarUint32::from_bin(stream).context(DeserializeSnafu { what })?.0 as usize)
}


use snafu::{OptionExt, ResultExt};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::data::TEST_ABI;

    fn test_abi() -> ABI {
        ABI::from_str(TEST_ABI).unwrap()
    }

    #[test]
    fn scalar_round_trip() {
        let abi = test_abi();
        let bin = abi.json_to_bin("uint8", "42").unwrap();
        assert_eq!(bin, vec![0x2a]);
        assert_eq!(abi.bin_to_json("uint8", &bin).unwrap(), "42");
    }

    #[test]
    fn optional_round_trip() {
        let abi = test_abi();
        assert_eq!(abi.json_to_bin("uint16?", "null").unwrap(), vec![0x00]);
        assert_eq!(abi.json_to_bin("uint16?", "5").unwrap(), vec![0x01, 0x05, 0x00]);
        assert_eq!(abi.bin_to_json("uint16?", &[0x00]).unwrap(), "null");
    }

    #[test]
    fn recursion_limit_is_enforced() {
        let abi = test_abi();
        let mut ctx = Ctx::new(2, false);
        assert!(ctx.enter("a").is_ok());
        assert!(ctx.enter("b").is_ok());
        assert!(ctx.enter("c").is_err());
        let _ = abi;
    }

    #[test]
    fn sized_byte_array_round_trips_as_hex_blob() {
        let abi = test_abi();
        let bin = abi.json_to_bin("byte[4]", "\"deadbeef\"").unwrap();
        assert_eq!(bin, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(abi.bin_to_json("byte[4]", &bin).unwrap(), "\"deadbeef\"");
        assert_eq!(abi.json_to_bin("char[4]", "\"deadbeef\"").unwrap(), bin);
    }

    #[test]
    fn sized_byte_array_rejects_wrong_length() {
        let abi = test_abi();
        assert!(abi.json_to_bin("byte[4]", "\"dead\"").is_err());
    }

    #[test]
    fn strict_struct_decode_rejects_out_of_order_fields() {
        let abi = ABI::from_str(r#"{
            "version": "eosio::abi/1.2",
            "structs": [
                {"name": "s", "base": "", "fields": [
                    {"name": "a", "type": "uint32"},
                    {"name": "b", "type": "string"}
                ]}
            ]
        }"#).unwrap();
        assert!(abi.json_to_bin("s", r#"{"b":"hi","a":1}"#).is_err());
        assert!(abi.json_to_bin_reorderable("s", r#"{"b":"hi","a":1}"#).is_ok());
    }

    #[test]
    fn strict_struct_encode_omits_trailing_extension_after_an_earlier_field() {
        // struct {a: uint32, b$: string}; omitting `b` must produce the same
        // bytes on the strict and reorderable paths (spec.md §8 invariant #2).
        let abi = ABI::from_str(r#"{
            "version": "eosio::abi/1.2",
            "structs": [
                {"name": "s", "base": "", "fields": [
                    {"name": "a", "type": "uint32"},
                    {"name": "b", "type": "string$"}
                ]}
            ]
        }"#).unwrap();
        let expected = vec![0x01, 0x00, 0x00, 0x00];
        assert_eq!(abi.json_to_bin("s", r#"{"a":1}"#).unwrap(), expected);
        assert_eq!(abi.json_to_bin_reorderable("s", r#"{"a":1}"#).unwrap(), expected);
    }
}
