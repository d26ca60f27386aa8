//! Parameter binder
//!
//! A [`SlotSet`] holds one [`ParameterSlot`] per declared parameter and walks the
//! argument tokens of a single invocation, routing each to a named or positional
//! slot. Finishing the set yields the argument values in declaration order.

use crate::binding::convert::{coerce, convert};
use crate::catalog::{CompositeType, ContainerShape, ParamType, ParameterSpec, Record, Value};
use crate::error::{BindError, BindResult, DefinitionError};
use crate::resolve::{Comparison, Token};
use std::sync::Arc;
use tracing::debug;

/// Marker that switches the rest of the arguments to positional-only
pub const POSITIONAL_ONLY: &str = "--";

/// How a slot takes values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Scalar,
    Nullable,
    /// Accumulates every value it is given
    Enumerable,
    /// Nested object whose fields are only set by name
    Composite,
}

impl SlotKind {
    pub fn of(ty: &ParamType) -> Self {
        match ty {
            ParamType::Enumerable { .. } => SlotKind::Enumerable,
            ParamType::Composite(_) => SlotKind::Composite,
            ParamType::Nullable(_) => SlotKind::Nullable,
            _ => SlotKind::Scalar,
        }
    }
}

#[derive(Debug)]
enum SlotState {
    Unset,
    Single(Value),
    Items(Vec<Value>),
    Fields(Vec<Option<Value>>),
}

/// Per-invocation binding target for one declared parameter
#[derive(Debug)]
pub struct ParameterSlot<'p> {
    pub spec: &'p ParameterSpec,
    pub kind: SlotKind,
    state: SlotState,
    field: Option<usize>,
}

impl<'p> ParameterSlot<'p> {
    pub fn new(spec: &'p ParameterSpec) -> Self {
        ParameterSlot {
            spec,
            kind: SlotKind::of(&spec.ty),
            state: SlotState::Unset,
            field: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn is_set(&self) -> bool {
        !matches!(self.state, SlotState::Unset)
    }

    /// Direct the next assignment to a field of a composite slot
    pub fn select_field(&mut self, index: usize) {
        self.field = Some(index);
    }

    /// Convert `token` and store it in this slot
    pub fn assign(&mut self, token: &str, cmp: Comparison) -> BindResult<()> {
        let spec = self.spec;
        let name = spec.name.as_str();

        match (&spec.ty, self.kind) {
            (ParamType::Enumerable { item, .. }, SlotKind::Enumerable) => {
                let value = convert(name, item, token, cmp)?;
                match &mut self.state {
                    SlotState::Items(items) => items.push(value),
                    state => *state = SlotState::Items(vec![value]),
                }
            }
            (ParamType::Composite(ty), SlotKind::Composite) => {
                let index = self
                    .field
                    .take()
                    .ok_or_else(|| BindError::PositionalComposite(name.to_string()))?;
                let field = &ty.fields[index];
                let value = convert(&field.name, &field.ty, token, cmp)?;

                // built on first use
                if !matches!(self.state, SlotState::Fields(_)) {
                    self.state = SlotState::Fields((0..ty.fields.len()).map(|_| None).collect());
                }
                if let SlotState::Fields(fields) = &mut self.state {
                    fields[index] = Some(value);
                }
            }
            (ty, _) => {
                self.state = SlotState::Single(convert(name, ty, token, cmp)?);
            }
        }

        debug!(parameter = name, token, "assigned");
        Ok(())
    }

    /// Produce the final value, applying defaults where nothing was given
    pub fn finish(self, cmp: Comparison) -> BindResult<Value> {
        let spec = self.spec;

        match (&spec.ty, self.state) {
            (ParamType::Enumerable { shape, .. }, state) => {
                let items = match state {
                    SlotState::Items(items) => items,
                    _ => Vec::new(),
                };
                match shape {
                    ContainerShape::List => Ok(Value::List(items)),
                    ContainerShape::Array => Ok(Value::Array(items)),
                    ContainerShape::Other(shape) => Err(DefinitionError::UnsupportedContainer {
                        parameter: spec.name.clone(),
                        shape: shape.clone(),
                    }
                    .into()),
                }
            }
            (ParamType::Composite(ty), SlotState::Fields(fields)) => build_record(ty, fields, cmp),
            (ParamType::Composite(ty), _) => {
                build_record(ty, (0..ty.fields.len()).map(|_| None).collect(), cmp)
            }
            (_, SlotState::Single(value)) => Ok(value),
            (ty, _) => match &spec.default {
                Some(default) => {
                    debug!(parameter = %spec.name, ?default, "using default");
                    coerce(&spec.name, ty, default, cmp)
                }
                None => Err(BindError::MissingArgument(spec.name.clone())),
            },
        }
    }
}

fn build_record(ty: &Arc<CompositeType>, values: Vec<Option<Value>>, cmp: Comparison) -> BindResult<Value> {
    let mut fields = Vec::with_capacity(ty.fields.len());

    for (field, value) in ty.fields.iter().zip(values) {
        let value = match (value, &field.default) {
            (Some(value), _) => value,
            (None, Some(default)) => coerce(&field.name, &field.ty, default, cmp)?,
            (None, None) => Value::Null,
        };
        fields.push((field.name.clone(), value));
    }

    Ok(Value::Record(Record {
        type_name: ty.name.clone(),
        fields,
    }))
}

/// Where the next token goes
#[derive(Debug, Clone, Copy)]
enum Pending {
    /// Named by the previous token; takes exactly one value
    Named(usize),
    /// Enumerable reached by position; keeps taking values
    Positional(usize),
}

/// The slots of one invocation plus the state of the argument walk
#[derive(Debug)]
pub struct SlotSet<'p> {
    slots: Vec<ParameterSlot<'p>>,
    cmp: Comparison,
    sigils: Vec<char>,
    pending: Option<Pending>,
    positional_only: bool,
}

impl<'p> SlotSet<'p> {
    pub fn create(parameters: &'p [ParameterSpec], cmp: Comparison, sigils: &str) -> Self {
        SlotSet {
            slots: parameters.iter().map(ParameterSlot::new).collect(),
            cmp,
            sigils: sigils.chars().collect(),
            pending: None,
            positional_only: false,
        }
    }

    pub fn slots(&self) -> &[ParameterSlot<'p>] {
        &self.slots
    }

    /// Feed every token in order
    pub fn bind<'t, I>(&mut self, tokens: I) -> BindResult<()>
    where
        I: IntoIterator<Item = &'t Token>,
    {
        for token in tokens {
            self.accept(&token.value)?;
        }
        Ok(())
    }

    /// Route a single token
    pub fn accept(&mut self, token: &str) -> BindResult<()> {
        // a named destination takes the next token verbatim
        if let Some(Pending::Named(index)) = self.pending {
            self.pending = None;
            return self.slots[index].assign(token, self.cmp);
        }

        if !self.positional_only {
            if token == POSITIONAL_ONLY {
                self.positional_only = true;
                self.pending = None;
                return Ok(());
            }

            if let Some(index) = self.find_named(token) {
                self.pending = Some(Pending::Named(index));
                return Ok(());
            }
        }

        let index = match self.pending {
            Some(Pending::Positional(index)) => index,
            _ => self.next_positional(token)?,
        };

        let slot = &mut self.slots[index];
        slot.assign(token, self.cmp)?;

        self.pending = match slot.kind {
            SlotKind::Enumerable => Some(Pending::Positional(index)),
            _ => None,
        };
        Ok(())
    }

    /// Finalize every slot into the argument list
    pub fn finish(self) -> BindResult<Vec<Value>> {
        let cmp = self.cmp;
        self.slots.into_iter().map(|slot| slot.finish(cmp)).collect()
    }

    fn next_positional(&self, token: &str) -> BindResult<usize> {
        // nested objects are never filled by position
        if let Some(index) = self
            .slots
            .iter()
            .position(|slot| slot.kind != SlotKind::Composite && !slot.is_set())
        {
            return Ok(index);
        }

        // a name nobody declared, rather than one value too many
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(sigil), Some(first))
                if !self.positional_only && self.sigils.contains(&sigil) && first.is_alphabetic() =>
            {
                Err(BindError::UnknownParameter(token[sigil.len_utf8()..].to_string()))
            }
            _ => Err(BindError::UnexpectedArgument(token.to_string())),
        }
    }

    /// Resolve a sigil-prefixed token to a slot, selecting a composite field if
    /// that is what it names
    fn find_named(&mut self, token: &str) -> Option<usize> {
        let sigil = token.chars().next().filter(|c| self.sigils.contains(c))?;
        let name = &token[sigil.len_utf8()..];
        if name.is_empty() {
            return None;
        }

        let cmp = self.cmp;
        if let Some(index) = self.slots.iter().position(|s| cmp.eq(s.name(), name)) {
            return Some(index);
        }

        let mut prefixed = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| cmp.starts_with(s.name(), name));
        if let (Some((index, _)), None) = (prefixed.next(), prefixed.next()) {
            return Some(index);
        }

        // fields of nested objects are addressed by their own names
        let (index, field) = self.slots.iter().enumerate().find_map(|(i, s)| match &s.spec.ty {
            ParamType::Composite(ty) => ty.field(name, cmp).map(|f| (i, f)),
            _ => None,
        })?;
        self.slots[index].select_field(field);
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EnumType, FieldSpec, Literal};
    use crate::resolve::Arguments;

    const SIGILS: &str = "-/@=";

    fn bind(params: &[ParameterSpec], line: &str) -> BindResult<Vec<Value>> {
        let mut set = SlotSet::create(params, Comparison::IgnoreCase, SIGILS);
        if !line.is_empty() {
            set.bind(&Arguments::parse(line))?;
        }
        set.finish()
    }

    fn strings(value: &Value) -> Vec<String> {
        value
            .as_items()
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect()
    }

    fn ab() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("a", ParamType::string()),
            ParameterSpec::new("b", ParamType::string()),
        ]
    }

    #[test]
    fn test_slot_kinds() {
        assert_eq!(SlotKind::of(&ParamType::string()), SlotKind::Scalar);
        assert_eq!(SlotKind::of(&ParamType::nullable(ParamType::int32())), SlotKind::Nullable);
        assert_eq!(SlotKind::of(&ParamType::array(ParamType::string())), SlotKind::Enumerable);
    }

    #[test]
    fn test_positional_and_named() {
        let values = bind(&ab(), "x y").unwrap();
        assert_eq!(values[0].as_str(), Some("x"));
        assert_eq!(values[1].as_str(), Some("y"));

        let values = bind(&ab(), "-b x y").unwrap();
        assert_eq!(values[0].as_str(), Some("y"));
        assert_eq!(values[1].as_str(), Some("x"));
    }

    #[test]
    fn test_positional_only_marker() {
        let values = bind(&ab(), "-- -a -b").unwrap();
        assert_eq!(values[0].as_str(), Some("-a"));
        assert_eq!(values[1].as_str(), Some("-b"));

        let values = bind(&ab(), "-b bbbbb -- -a").unwrap();
        assert_eq!(values[0].as_str(), Some("-a"));
        assert_eq!(values[1].as_str(), Some("bbbbb"));
    }

    #[test]
    fn test_named_prefix_must_be_unique() {
        let params = vec![
            ParameterSpec::new("width", ParamType::int32()),
            ParameterSpec::new("weight", ParamType::int32()),
            ParameterSpec::new("height", ParamType::int32()).with_default(Literal::Int(0)),
        ];
        let values = bind(&params, "-wi 1 -we 2 -h 3").unwrap();
        assert_eq!(values[0].as_i64(), Some(1));
        assert_eq!(values[1].as_i64(), Some(2));
        assert_eq!(values[2].as_i64(), Some(3));

        // ambiguous, so it is taken as a value and fails to convert
        let err = bind(&params, "-w 1 2").unwrap_err();
        assert!(matches!(err, BindError::Conversion { .. }));
    }

    #[test]
    fn test_negative_number_is_positional() {
        let params = vec![ParameterSpec::new("i", ParamType::int32())];
        assert_eq!(bind(&params, "-5").unwrap()[0].as_i64(), Some(-5));
    }

    #[test]
    fn test_enumerable_is_greedy() {
        let params = vec![ParameterSpec::new("ss", ParamType::array(ParamType::string()))];
        let values = bind(&params, "a b c").unwrap();
        assert_eq!(strings(&values[0]), vec!["a", "b", "c"]);
        assert!(matches!(values[0], Value::Array(_)));
    }

    #[test]
    fn test_enumerable_interrupted_by_name() {
        let params = vec![
            ParameterSpec::new("items", ParamType::list(ParamType::int32())),
            ParameterSpec::new("label", ParamType::string()),
        ];
        let values = bind(&params, "1 2 -label x").unwrap();
        assert_eq!(strings(&values[0]), vec!["1", "2"]);
        assert_eq!(values[1].as_str(), Some("x"));
    }

    #[test]
    fn test_enumerable_finishes_empty() {
        let params = vec![ParameterSpec::new("ss", ParamType::list(ParamType::string()))];
        let values = bind(&params, "").unwrap();
        assert!(matches!(&values[0], Value::List(items) if items.is_empty()));
    }

    #[test]
    fn test_unsupported_container() {
        let params = vec![ParameterSpec::new(
            "ss",
            ParamType::Enumerable {
                item: Box::new(ParamType::string()),
                shape: ContainerShape::Other("HashSet".into()),
            },
        )];
        let err = bind(&params, "a").unwrap_err();
        assert!(matches!(
            err,
            BindError::Definition(DefinitionError::UnsupportedContainer { .. })
        ));
    }

    #[test]
    fn test_defaults_and_missing() {
        let days = Arc::new(EnumType::new("DayOfWeek", &["Sunday", "Monday", "Friday"]));
        let params = vec![
            ParameterSpec::new("d", ParamType::date_time()),
            ParameterSpec::new("w", ParamType::nullable(ParamType::enumeration(days)))
                .with_default(Literal::Text("Friday".into())),
        ];
        let values = bind(&params, "2017-10-28").unwrap();
        assert_eq!(values[1].to_string(), "Friday");

        let err = bind(&params, "").unwrap_err();
        assert!(matches!(err, BindError::MissingArgument(ref name) if name == "d"));
    }

    #[test]
    fn test_too_many_arguments() {
        let err = bind(&ab(), "x y z").unwrap_err();
        assert!(matches!(err, BindError::UnexpectedArgument(ref t) if t == "z"));

        let err = bind(&ab(), "x y -zed").unwrap_err();
        assert!(matches!(err, BindError::UnknownParameter(ref n) if n == "zed"));

        let err = bind(&ab(), "x y -1").unwrap_err();
        assert!(matches!(err, BindError::UnexpectedArgument(ref t) if t == "-1"));
    }

    fn options() -> Vec<ParameterSpec> {
        let ty = Arc::new(CompositeType::new(
            "Options",
            vec![
                FieldSpec::new("depth", ParamType::int32()).with_default(Literal::Int(1)),
                FieldSpec::new("verbose", ParamType::boolean()),
            ],
        ));
        vec![ParameterSpec::new("options", ParamType::composite(ty))]
    }

    #[test]
    fn test_composite_fields_by_name() {
        let values = bind(&options(), "-verbose true").unwrap();
        let record = values[0].as_record().unwrap();
        assert_eq!(record.get("depth").unwrap().as_i64(), Some(1));
        assert_eq!(record.get("verbose").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_composite_default_constructed() {
        let values = bind(&options(), "").unwrap();
        let record = values[0].as_record().unwrap();
        assert_eq!(record.type_name, "Options");
        assert!(record.get("verbose").unwrap().is_null());
    }

    #[test]
    fn test_composite_named_without_field() {
        let err = bind(&options(), "-options 3").unwrap_err();
        assert!(matches!(err, BindError::PositionalComposite(ref name) if name == "options"));
    }

    #[test]
    fn test_positional_skips_composite() {
        let mut params = options();
        params.push(ParameterSpec::new("label", ParamType::string()));

        for line in ["x", "-verbose true x", "x -verbose true"] {
            let values = bind(&params, line).unwrap();
            assert_eq!(values[1].as_str(), Some("x"), "{}", line);
        }

        let err = bind(&options(), "3").unwrap_err();
        assert!(matches!(err, BindError::UnexpectedArgument(ref t) if t == "3"));
    }

    #[test]
    fn test_enumerable_interrupted_by_marker() {
        let params = vec![
            ParameterSpec::new("items", ParamType::list(ParamType::int32())),
            ParameterSpec::new("n", ParamType::int32()),
        ];
        let values = bind(&params, "1 2 -- 3").unwrap();
        assert_eq!(strings(&values[0]), vec!["1", "2"]);
        assert_eq!(values[1].as_i64(), Some(3));
    }
}
