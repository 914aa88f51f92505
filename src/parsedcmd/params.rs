//! # Parameter Model
//!
//! Turns a canonical function's declarations into the ordered list of
//! [`ParameterDescriptor`]s the binder and the usage formatter work from.
//!
//! The model depends only on static declarations, so the shell builds it once per
//! function and caches it (see [`DescriptorCache`]).

use crate::coerce::Coercion;
use crate::error::ResolutionError;
use crate::function::{DeclaredKind, Function, Parameter};
use crate::value::Value;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

const RAW_LINE_NAME: &str = "line";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Positional,
    Variadic,
    KeywordOnly,
    /// The whole unprocessed line; only ever the sole descriptor.
    RawLine,
}

#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub name: String,
    pub kind: ParameterKind,
    pub default: Option<Value>,
    pub coercion: Coercion,
    /// Slot in the bound positional list, for positional and variadic descriptors.
    pub position: Option<usize>,
}

/// Ordered descriptors for one function.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    descriptors: Vec<ParameterDescriptor>,
}

impl Parameters {
    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn keyword_only(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.get(name)
            .filter(|d| d.kind == ParameterKind::KeywordOnly)
    }

    pub fn positional(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.kind == ParameterKind::Positional)
    }

    pub fn variadic(&self) -> Option<&ParameterDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.kind == ParameterKind::Variadic)
    }

    pub fn is_raw(&self) -> bool {
        matches!(
            self.descriptors.as_slice(),
            [d] if d.kind == ParameterKind::RawLine
        )
    }
}

/// Build the descriptor list for a canonical signature.
///
/// Declaration order is kept and the receiver is dropped. A raw-mode function gets a
/// single [`ParameterKind::RawLine`] descriptor named after its first bindable
/// parameter.
pub fn build(
    function_name: &str,
    signature: &[Parameter],
    explicit_annotations: &BTreeMap<String, Coercion>,
    explicit_keyword_only: &BTreeSet<String>,
    raw_mode: bool,
) -> Result<Parameters, ResolutionError> {
    let bindable = signature
        .iter()
        .filter(|p| p.kind != DeclaredKind::Receiver);

    if raw_mode {
        let name = signature
            .iter()
            .find(|p| p.kind != DeclaredKind::Receiver)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| RAW_LINE_NAME.to_string());
        return Ok(Parameters {
            descriptors: vec![ParameterDescriptor {
                name,
                kind: ParameterKind::RawLine,
                default: None,
                coercion: Coercion::string(),
                position: Some(0),
            }],
        });
    }

    let mut descriptors = Vec::new();
    let mut position = 0;
    let mut optional_seen = false;

    for param in bindable {
        let kind = if explicit_keyword_only.contains(&param.name)
            || param.kind == DeclaredKind::KeywordOnly
        {
            ParameterKind::KeywordOnly
        } else if param.kind == DeclaredKind::Variadic {
            ParameterKind::Variadic
        } else {
            ParameterKind::Positional
        };

        let slot = match kind {
            ParameterKind::Positional => {
                if param.default.is_some() {
                    optional_seen = true;
                } else if optional_seen {
                    return Err(ResolutionError::RequiredAfterOptional {
                        function: function_name.to_string(),
                        parameter: param.name.clone(),
                    });
                }
                position += 1;
                Some(position - 1)
            }
            ParameterKind::Variadic => Some(position),
            _ => None,
        };

        let coercion = explicit_annotations
            .get(&param.name)
            .or(param.annotation.as_ref())
            .cloned()
            .unwrap_or_default();

        descriptors.push(ParameterDescriptor {
            name: param.name.clone(),
            kind,
            default: param.default.clone(),
            coercion,
            position: slot,
        });
    }

    Ok(Parameters { descriptors })
}

/// [`build`] applied to a function's own declarations.
///
/// `raw_mode` is passed separately because raw mode may be requested by the command's
/// outer function rather than the canonical one.
pub fn build_for(canonical: &Function, raw_mode: bool) -> Result<Parameters, ResolutionError> {
    canonical.validate()?;
    build(
        canonical.name(),
        canonical.params(),
        &canonical.annotations,
        &canonical.keyword_only,
        raw_mode,
    )
}

/// Write-once descriptor lists keyed by the name of the function they describe.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: HashMap<(String, bool), Rc<Parameters>>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list, building it on first use.
    pub fn get_or_build(
        &mut self,
        canonical: &Function,
        raw_mode: bool,
    ) -> Result<Rc<Parameters>, ResolutionError> {
        match self.entries.entry((canonical.name().to_string(), raw_mode)) {
            Entry::Occupied(entry) => Ok(Rc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let params = Rc::new(build_for(canonical, raw_mode)?);
                Ok(Rc::clone(entry.insert(params)))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn do_print() -> Function {
        Function::new("do_print")
            .param(Parameter::receiver("self"))
            .param(Parameter::positional("line").default("abc"))
            .param(
                Parameter::keyword_only("flag")
                    .default(true)
                    .annotated(Coercion::boolean()),
            )
            .param(
                Parameter::keyword_only("repeat")
                    .default(1)
                    .annotated(Coercion::integer()),
            )
    }

    fn names(params: &Parameters) -> Vec<&str> {
        params.descriptors().iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn keeps_order_and_drops_receiver() {
        let params = build_for(&do_print(), false).unwrap();
        assert_eq!(names(&params), vec!["line", "flag", "repeat"]);
        assert_eq!(params.get("line").unwrap().position, Some(0));
        assert_eq!(params.get("flag").unwrap().position, None);
    }

    #[test]
    fn classifies_kinds() {
        let f = Function::new("do_multiply")
            .param(Parameter::positional("mul").annotated(Coercion::integer()))
            .param(Parameter::variadic("nums").annotated(Coercion::integer()));
        let params = build_for(&f, false).unwrap();
        assert_eq!(params.get("mul").unwrap().kind, ParameterKind::Positional);
        let nums = params.variadic().unwrap();
        assert_eq!(nums.name, "nums");
        assert_eq!(nums.position, Some(1));
    }

    #[test]
    fn explicit_keyword_only_joins_native_ones() {
        // Retrofitted declarations: plain positional parameters made keyword-only.
        let f = Function::new("do_print")
            .param(Parameter::positional("line").default("abc"))
            .param(Parameter::positional("flag").default(true))
            .param(Parameter::keyword_only("repeat").default(1))
            .keyword_only("flag");
        let params = build_for(&f, false).unwrap();
        assert_eq!(params.keyword_only("flag").unwrap().position, None);
        assert!(params.keyword_only("repeat").is_some());
        assert_eq!(params.positional().count(), 1);
    }

    #[test]
    fn explicit_annotation_overrides_native() {
        let f = Function::new("f")
            .param(Parameter::positional("n").annotated(Coercion::float()))
            .annotate("n", Coercion::integer());
        let params = build_for(&f, false).unwrap();
        assert_eq!(params.get("n").unwrap().coercion.name(), "int");
    }

    #[test]
    fn unannotated_parameters_pass_strings_through() {
        let f = Function::new("f").param(Parameter::positional("s"));
        let params = build_for(&f, false).unwrap();
        assert_eq!(params.get("s").unwrap().coercion.name(), "str");
    }

    #[test]
    fn defaults_are_kept_verbatim() {
        let f = Function::new("f").param(
            Parameter::positional("n")
                .default("not a number")
                .annotated(Coercion::integer()),
        );
        let params = build_for(&f, false).unwrap();
        assert_eq!(params.get("n").unwrap().default, Some(Value::from("not a number")));
    }

    #[test]
    fn raw_mode_yields_single_descriptor() {
        let f = Function::new("do_shell")
            .param(Parameter::receiver("self"))
            .param(Parameter::positional("cmdline"))
            .raw();
        let params = build_for(&f, true).unwrap();
        assert!(params.is_raw());
        assert_eq!(names(&params), vec!["cmdline"]);
    }

    #[test]
    fn raw_mode_without_parameters_is_named_line() {
        let params = build_for(&Function::new("f"), true).unwrap();
        assert_eq!(names(&params), vec!["line"]);
    }

    #[test]
    fn required_after_optional_is_rejected() {
        let f = Function::new("f")
            .param(Parameter::positional("a").default(1))
            .param(Parameter::positional("b"));
        assert!(matches!(
            build_for(&f, false),
            Err(ResolutionError::RequiredAfterOptional { parameter, .. }) if parameter == "b"
        ));
    }

    #[test]
    fn extracting_keyword_only_can_fix_ordering() {
        let f = Function::new("f")
            .param(Parameter::positional("a").default(1))
            .param(Parameter::positional("b"))
            .keyword_only("a");
        assert!(build_for(&f, false).is_ok());
    }

    #[test]
    fn cache_builds_once() {
        let mut cache = DescriptorCache::new();
        let f = do_print();
        let first = cache.get_or_build(&f, false).unwrap();
        let second = cache.get_or_build(&f, false).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }
}
