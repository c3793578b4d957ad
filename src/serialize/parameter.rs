//! Parameter encoding
//!
//! A parameter keeps its own attributes whatever tag it is written under, so
//! the same functions serve `<RealParameter>` in a device's parameter list and
//! named slots like `<Volume>` or `<Threshold>`.

use crate::codec;
use crate::error::{DawError, Result};
use crate::model::{
    BoolParameter, EnumParameter, Id, IntegerParameter, Parameter, RealParameter,
    TimeSignatureParameter,
};
use crate::registry::EntityKind;
use crate::serialize::resolver::PARAMETER;
use crate::serialize::{
    read_identity, read_nameable, required_int, write_identity, write_nameable, DecodeContext,
    Element, FromElement, ToElement,
};

fn write_parameter_id(element: &mut Element, parameter_id: Option<i32>) {
    element.set_opt_attr("parameterID", codec::encode_int(parameter_id));
}

fn read_parameter_id(element: &Element) -> Result<Option<i32>> {
    codec::decode_int("parameterID", element.attr("parameterID"))
}

// === Real ===

pub fn encode_real(param: &RealParameter, tag: &str) -> Element {
    let mut el = Element::new(tag);
    write_identity(&mut el, &param.identity);
    write_parameter_id(&mut el, param.parameter_id);
    el.set_opt_attr("value", codec::encode_real(param.value));
    el.set_opt_attr("unit", codec::encode_enum(param.unit));
    el.set_opt_attr("min", codec::encode_real(param.min));
    el.set_opt_attr("max", codec::encode_real(param.max));
    el
}

pub fn decode_real(el: &Element, ctx: &mut DecodeContext) -> Result<RealParameter> {
    Ok(RealParameter {
        identity: read_identity(el, ctx, EntityKind::Parameter)?,
        parameter_id: read_parameter_id(el)?,
        value: codec::decode_real("value", el.attr("value"))?,
        unit: codec::decode_enum("unit", el.attr("unit"))?,
        min: codec::decode_real("min", el.attr("min"))?,
        max: codec::decode_real("max", el.attr("max"))?,
    })
}

// === Bool ===

pub fn encode_bool(param: &BoolParameter, tag: &str) -> Element {
    let mut el = Element::new(tag);
    write_identity(&mut el, &param.identity);
    write_parameter_id(&mut el, param.parameter_id);
    el.set_opt_attr("value", codec::encode_bool(param.value));
    el
}

pub fn decode_bool(el: &Element, ctx: &mut DecodeContext) -> Result<BoolParameter> {
    Ok(BoolParameter {
        identity: read_identity(el, ctx, EntityKind::Parameter)?,
        parameter_id: read_parameter_id(el)?,
        value: codec::decode_bool("value", el.attr("value"))?,
    })
}

// === Integer ===

pub fn encode_integer(param: &IntegerParameter, tag: &str) -> Element {
    let mut el = Element::new(tag);
    write_identity(&mut el, &param.identity);
    write_parameter_id(&mut el, param.parameter_id);
    el.set_opt_attr("value", codec::encode_int(param.value));
    el.set_opt_attr("min", codec::encode_int(param.min));
    el.set_opt_attr("max", codec::encode_int(param.max));
    el
}

pub fn decode_integer(el: &Element, ctx: &mut DecodeContext) -> Result<IntegerParameter> {
    Ok(IntegerParameter {
        identity: read_identity(el, ctx, EntityKind::Parameter)?,
        parameter_id: read_parameter_id(el)?,
        value: codec::decode_int("value", el.attr("value"))?,
        min: codec::decode_int("min", el.attr("min"))?,
        max: codec::decode_int("max", el.attr("max"))?,
    })
}

// === Enum ===

pub fn encode_enum(param: &EnumParameter, tag: &str) -> Element {
    let mut el = Element::new(tag);
    write_identity(&mut el, &param.identity);
    write_parameter_id(&mut el, param.parameter_id);
    el.set_opt_attr("value", codec::encode_int(param.value));
    el.set_opt_attr("count", codec::encode_int(param.count));
    el.set_opt_attr("labels", codec::encode_labels(&param.labels));
    el
}

pub fn decode_enum(el: &Element, ctx: &mut DecodeContext) -> Result<EnumParameter> {
    Ok(EnumParameter {
        identity: read_identity(el, ctx, EntityKind::Parameter)?,
        parameter_id: read_parameter_id(el)?,
        value: codec::decode_int("value", el.attr("value"))?,
        count: codec::decode_int("count", el.attr("count"))?,
        labels: codec::decode_labels(el.attr("labels")),
    })
}

// === Time Signature ===

pub fn encode_time_signature(param: &TimeSignatureParameter, tag: &str) -> Element {
    let mut el = Element::new(tag);
    if let Some(id) = &param.id {
        el.set_attr("id", id.as_str());
    }
    write_nameable(&mut el, &param.nameable);
    write_parameter_id(&mut el, param.parameter_id);
    el.set_attr("numerator", param.numerator.to_string());
    el.set_attr("denominator", param.denominator.to_string());
    el
}

/// The token is optional here; one that is present is registered.
pub fn decode_time_signature(
    el: &Element,
    ctx: &mut DecodeContext,
) -> Result<TimeSignatureParameter> {
    let id = el.attr("id").map(Id::new);
    if let Some(id) = &id {
        ctx.register(id, EntityKind::Parameter)?;
    }
    Ok(TimeSignatureParameter {
        id,
        nameable: read_nameable(el),
        parameter_id: read_parameter_id(el)?,
        numerator: required_int(el, "numerator")?,
        denominator: required_int(el, "denominator")?,
    })
}

// === Role Decoders ===

pub fn decode_any_real(el: &Element, ctx: &mut DecodeContext) -> Result<Parameter> {
    decode_real(el, ctx).map(Parameter::Real)
}

pub fn decode_any_bool(el: &Element, ctx: &mut DecodeContext) -> Result<Parameter> {
    decode_bool(el, ctx).map(Parameter::Bool)
}

pub fn decode_any_integer(el: &Element, ctx: &mut DecodeContext) -> Result<Parameter> {
    decode_integer(el, ctx).map(Parameter::Integer)
}

pub fn decode_any_enum(el: &Element, ctx: &mut DecodeContext) -> Result<Parameter> {
    decode_enum(el, ctx).map(Parameter::Enum)
}

pub fn decode_any_time_signature(el: &Element, ctx: &mut DecodeContext) -> Result<Parameter> {
    decode_time_signature(el, ctx).map(Parameter::TimeSignature)
}

// === Slot Helpers ===

pub(crate) fn real_slot(
    parent: &Element,
    tag: &str,
    ctx: &mut DecodeContext,
) -> Result<Option<RealParameter>> {
    parent
        .child(tag)
        .map(|el| decode_real(el, ctx))
        .transpose()
}

pub(crate) fn bool_slot(
    parent: &Element,
    tag: &str,
    ctx: &mut DecodeContext,
) -> Result<Option<BoolParameter>> {
    parent
        .child(tag)
        .map(|el| decode_bool(el, ctx))
        .transpose()
}

pub(crate) fn push_real(parent: &mut Element, tag: &str, param: &Option<RealParameter>) {
    if let Some(param) = param {
        parent.push(encode_real(param, tag));
    }
}

pub(crate) fn push_bool(parent: &mut Element, tag: &str, param: &Option<BoolParameter>) {
    if let Some(param) = param {
        parent.push(encode_bool(param, tag));
    }
}

impl ToElement for Parameter {
    fn to_element(&self) -> Result<Element> {
        Ok(match self {
            Parameter::Real(p) => encode_real(p, "RealParameter"),
            Parameter::Bool(p) => encode_bool(p, "BoolParameter"),
            Parameter::Integer(p) => encode_integer(p, "IntegerParameter"),
            Parameter::Enum(p) => encode_enum(p, "EnumParameter"),
            Parameter::TimeSignature(p) => encode_time_signature(p, "TimeSignatureParameter"),
        })
    }
}

impl FromElement for Parameter {
    fn from_element(element: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        match PARAMETER.decode(element, ctx)? {
            Some(param) => Ok(param),
            None => Err(DawError::UnknownVariant {
                role: "parameter".to_string(),
                tag: element.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;
    use crate::registry::IdentityRegistry;

    fn round_trip(param: &Parameter) -> Parameter {
        let el = param.to_element().unwrap();
        Parameter::from_element(&el, &mut DecodeContext::default()).unwrap()
    }

    #[test]
    fn test_real_round_trip_with_infinities() {
        let mut registry = IdentityRegistry::new();
        let mut threshold = RealParameter::new(&mut registry, -18.0, Unit::Decibel);
        threshold.min = Some(f64::NEG_INFINITY);
        threshold.max = Some(f64::INFINITY);
        threshold.parameter_id = Some(12);

        let el = encode_real(&threshold, "Threshold");
        assert_eq!(el.name, "Threshold");
        assert_eq!(el.attr("min"), Some("-inf"));
        assert_eq!(el.attr("max"), Some("inf"));

        let back = decode_real(&el, &mut DecodeContext::default()).unwrap();
        assert_eq!(back, threshold);
    }

    #[test]
    fn test_unset_values_stay_unset() {
        let mut registry = IdentityRegistry::new();
        let mut param = RealParameter::new(&mut registry, 0.0, Unit::Linear);
        param.value = None;
        param.unit = None;

        let el = encode_real(&param, "RealParameter");
        assert!(el.attr("value").is_none());
        assert!(el.attr("unit").is_none());
        assert_eq!(round_trip(&Parameter::Real(param.clone())), Parameter::Real(param));
    }

    #[test]
    fn test_bool_tri_state() {
        let mut registry = IdentityRegistry::new();
        let mut mute = BoolParameter::new(&mut registry, false);
        assert_eq!(round_trip(&Parameter::Bool(mute.clone())), Parameter::Bool(mute.clone()));

        mute.value = None;
        let el = encode_bool(&mute, "Mute");
        assert!(el.attr("value").is_none());
        let back = decode_bool(&el, &mut DecodeContext::default()).unwrap();
        assert_eq!(back.value, None);
    }

    #[test]
    fn test_integer_and_enum_round_trip() {
        let mut registry = IdentityRegistry::new();
        let mut steps = IntegerParameter::new(&mut registry, 16);
        steps.min = Some(1);
        steps.max = Some(64);
        let shape = EnumParameter::new(
            &mut registry,
            2,
            vec!["Sine".into(), "Saw".into(), "Square".into()],
        );

        for param in [Parameter::Integer(steps), Parameter::Enum(shape)] {
            assert_eq!(round_trip(&param), param);
        }
    }

    #[test]
    fn test_time_signature_optional_token() {
        let ts = TimeSignatureParameter::new(7, 8);
        let el = encode_time_signature(&ts, "TimeSignature");
        assert!(el.attr("id").is_none());
        assert_eq!(round_trip(&Parameter::TimeSignature(ts.clone())), Parameter::TimeSignature(ts));

        let mut ctx = DecodeContext::default();
        let with_id = el.clone().with_attr("id", "ts0");
        let decoded = decode_time_signature(&with_id, &mut ctx).unwrap();
        assert_eq!(decoded.id, Some(Id::from("ts0")));
        assert!(ctx.registry.contains(&Id::from("ts0")));
    }

    #[test]
    fn test_time_signature_requires_numerator() {
        let el = Element::new("TimeSignature").with_attr("denominator", "4");
        let err = decode_time_signature(&el, &mut DecodeContext::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REQUIRED_FIELD");
    }

    #[test]
    fn test_malformed_unit() {
        let el = Element::new("RealParameter")
            .with_attr("id", "p0")
            .with_attr("unit", "furlongs");
        let err = decode_real(&el, &mut DecodeContext::default()).unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_VALUE");
    }
}
