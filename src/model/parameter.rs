//! Parameter family

use crate::model::{Id, IdentityFields, NameableFields, Unit};
use crate::registry::{EntityKind, IdentityRegistry};

/// Continuous parameter
#[derive(Debug, Clone, PartialEq)]
pub struct RealParameter {
    pub identity: IdentityFields,
    /// Plug-in parameter index
    pub parameter_id: Option<i32>,
    pub value: Option<f64>,
    pub unit: Option<Unit>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RealParameter {
    pub fn new(registry: &mut IdentityRegistry, value: f64, unit: Unit) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Parameter),
            parameter_id: None,
            value: Some(value),
            unit: Some(unit),
            min: None,
            max: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Linear gain where 1.0 is unity
    pub fn gain(registry: &mut IdentityRegistry, value: f64) -> Self {
        Self::new(registry, value, Unit::Linear).with_range(0.0, 2.0)
    }

    /// Normalized pan where 0.5 is center
    pub fn pan(registry: &mut IdentityRegistry, value: f64) -> Self {
        Self::new(registry, value, Unit::Normalized).with_range(0.0, 1.0)
    }
}

/// On/off parameter. The value is tri-state: unset is not `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolParameter {
    pub identity: IdentityFields,
    pub parameter_id: Option<i32>,
    pub value: Option<bool>,
}

impl BoolParameter {
    pub fn new(registry: &mut IdentityRegistry, value: bool) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Parameter),
            parameter_id: None,
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerParameter {
    pub identity: IdentityFields,
    pub parameter_id: Option<i32>,
    pub value: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl IntegerParameter {
    pub fn new(registry: &mut IdentityRegistry, value: i64) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Parameter),
            parameter_id: None,
            value: Some(value),
            min: None,
            max: None,
        }
    }
}

/// Parameter selecting one of `count` labelled options by index
#[derive(Debug, Clone, PartialEq)]
pub struct EnumParameter {
    pub identity: IdentityFields,
    pub parameter_id: Option<i32>,
    pub value: Option<i64>,
    pub count: Option<u32>,
    pub labels: Vec<String>,
}

impl EnumParameter {
    pub fn new(registry: &mut IdentityRegistry, value: i64, labels: Vec<String>) -> Self {
        Self {
            identity: IdentityFields::assign(registry, EntityKind::Parameter),
            parameter_id: None,
            value: Some(value),
            count: Some(labels.len() as u32),
            labels,
        }
    }

    pub fn selected_label(&self) -> Option<&str> {
        let index = usize::try_from(self.value?).ok()?;
        self.labels.get(index).map(String::as_str)
    }
}

/// Time signature. Not given a token on construction; a token read from a
/// document is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignatureParameter {
    pub id: Option<Id>,
    pub nameable: NameableFields,
    pub parameter_id: Option<i32>,
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignatureParameter {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            id: None,
            nameable: NameableFields::default(),
            parameter_id: None,
            numerator,
            denominator,
        }
    }
}

/// Any parameter, as found in a device's automated parameter list
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Real(RealParameter),
    Bool(BoolParameter),
    Integer(IntegerParameter),
    Enum(EnumParameter),
    TimeSignature(TimeSignatureParameter),
}

impl Parameter {
    pub fn id(&self) -> Option<&Id> {
        match self {
            Parameter::Real(p) => Some(&p.identity.id),
            Parameter::Bool(p) => Some(&p.identity.id),
            Parameter::Integer(p) => Some(&p.identity.id),
            Parameter::Enum(p) => Some(&p.identity.id),
            Parameter::TimeSignature(p) => p.id.as_ref(),
        }
    }

    pub fn parameter_id(&self) -> Option<i32> {
        match self {
            Parameter::Real(p) => p.parameter_id,
            Parameter::Bool(p) => p.parameter_id,
            Parameter::Integer(p) => p.parameter_id,
            Parameter::Enum(p) => p.parameter_id,
            Parameter::TimeSignature(p) => p.parameter_id,
        }
    }
}

impl From<RealParameter> for Parameter {
    fn from(p: RealParameter) -> Self {
        Parameter::Real(p)
    }
}

impl From<BoolParameter> for Parameter {
    fn from(p: BoolParameter) -> Self {
        Parameter::Bool(p)
    }
}

impl From<IntegerParameter> for Parameter {
    fn from(p: IntegerParameter) -> Self {
        Parameter::Integer(p)
    }
}

impl From<EnumParameter> for Parameter {
    fn from(p: EnumParameter) -> Self {
        Parameter::Enum(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_get_tokens() {
        let mut registry = IdentityRegistry::new();
        let volume = RealParameter::gain(&mut registry, 1.0);
        let mute = BoolParameter::new(&mut registry, false);

        assert_ne!(volume.identity.id, mute.identity.id);
        assert_eq!(registry.count_of(EntityKind::Parameter), 2);
    }

    #[test]
    fn test_time_signature_has_no_token() {
        let mut registry = IdentityRegistry::new();
        let ts = TimeSignatureParameter::new(3, 4);
        assert!(ts.id.is_none());
        assert!(Parameter::TimeSignature(ts).id().is_none());
        assert!(registry.assign(EntityKind::Parameter).as_str() == "id0");
    }

    #[test]
    fn test_enum_parameter_label() {
        let mut registry = IdentityRegistry::new();
        let shape = EnumParameter::new(
            &mut registry,
            1,
            vec!["Sine".to_string(), "Saw".to_string()],
        );
        assert_eq!(shape.count, Some(2));
        assert_eq!(shape.selected_label(), Some("Saw"));
    }
}
