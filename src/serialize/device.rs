//! Device encoding

use crate::codec;
use crate::error::{DawError, Result};
use crate::model::{
    BuiltinDevice, BuiltinPayload, Compressor, Device, DeviceFields, DeviceRole, EqBand,
    Equalizer, Limiter, NoiseGate, Plugin, PluginFormat,
};
use crate::registry::EntityKind;
use crate::serialize::parameter::{bool_slot, push_bool, push_real, real_slot};
use crate::serialize::resolver::{DEVICE, PARAMETER};
use crate::serialize::timeline::{decode_file_reference, encode_file_reference};
use crate::serialize::{
    parameter, read_identity, write_identity, DecodeContext, Element, FromElement, ToElement,
};

fn write_fields(el: &mut Element, fields: &DeviceFields) -> Result<()> {
    let role: DeviceRole = fields
        .device_role
        .ok_or_else(|| DawError::missing(&el.name, "deviceRole"))?;
    let name = fields
        .device_name
        .as_deref()
        .ok_or_else(|| DawError::missing(&el.name, "deviceName"))?;

    write_identity(el, &fields.identity);
    el.set_attr("deviceRole", role.to_string());
    el.set_attr("deviceName", name);
    el.set_opt_attr("loaded", codec::encode_bool(fields.loaded));
    el.set_opt_attr("deviceID", fields.device_id.clone());
    el.set_opt_attr("deviceVendor", fields.device_vendor.clone());

    if !fields.parameters.is_empty() {
        let mut params = Element::new("Parameters");
        for param in &fields.parameters {
            params.push(param.to_element()?);
        }
        el.push(params);
    }
    push_bool(el, "Enabled", &fields.enabled);
    if let Some(state) = &fields.state {
        el.push(encode_file_reference(state, "State"));
    }
    Ok(())
}

fn read_fields(el: &Element, ctx: &mut DecodeContext) -> Result<DeviceFields> {
    let identity = read_identity(el, ctx, EntityKind::Device)?;
    let device_role = codec::decode_enum("deviceRole", Some(el.required_attr("deviceRole")?))?;
    let device_name = Some(el.required_attr("deviceName")?.to_string());

    let parameters = match el.child("Parameters") {
        Some(params) => PARAMETER.decode_children(params, &[], ctx)?,
        None => Vec::new(),
    };

    Ok(DeviceFields {
        identity,
        device_role,
        device_name,
        device_id: el.attr("deviceID").map(str::to_string),
        device_vendor: el.attr("deviceVendor").map(str::to_string),
        loaded: codec::decode_bool("loaded", el.attr("loaded"))?,
        enabled: bool_slot(el, "Enabled", ctx)?,
        state: el.child("State").map(decode_file_reference).transpose()?,
        parameters,
    })
}

impl ToElement for Device {
    fn to_element(&self) -> Result<Element> {
        let mut el = Element::new(self.tag());
        write_fields(&mut el, self.fields())?;

        match self {
            Device::Plugin(plugin) => {
                el.set_opt_attr("pluginVersion", plugin.plugin_version.clone());
            }
            Device::Builtin(builtin) => encode_payload(&mut el, &builtin.payload),
        }
        Ok(el)
    }
}

impl FromElement for Device {
    fn from_element(element: &Element, ctx: &mut DecodeContext) -> Result<Self> {
        DEVICE
            .decode(element, ctx)?
            .ok_or_else(|| DawError::UnknownVariant {
                role: "device".to_string(),
                tag: element.name.clone(),
            })
    }
}

fn encode_payload(el: &mut Element, payload: &BuiltinPayload) {
    match payload {
        BuiltinPayload::Generic => {}
        BuiltinPayload::Equalizer(eq) => {
            for band in &eq.bands {
                el.push(encode_band(band));
            }
            push_real(el, "InputGain", &eq.input_gain);
            push_real(el, "OutputGain", &eq.output_gain);
        }
        BuiltinPayload::Compressor(comp) => {
            push_real(el, "Attack", &comp.attack);
            push_bool(el, "AutoMakeup", &comp.auto_makeup);
            push_real(el, "InputGain", &comp.input_gain);
            push_real(el, "OutputGain", &comp.output_gain);
            push_real(el, "Ratio", &comp.ratio);
            push_real(el, "Release", &comp.release);
            push_real(el, "Threshold", &comp.threshold);
        }
        BuiltinPayload::Limiter(limiter) => {
            push_real(el, "Attack", &limiter.attack);
            push_real(el, "InputGain", &limiter.input_gain);
            push_real(el, "OutputGain", &limiter.output_gain);
            push_real(el, "Release", &limiter.release);
            push_real(el, "Threshold", &limiter.threshold);
        }
        BuiltinPayload::NoiseGate(gate) => {
            push_real(el, "Attack", &gate.attack);
            push_real(el, "Range", &gate.range);
            push_real(el, "Ratio", &gate.ratio);
            push_real(el, "Release", &gate.release);
            push_real(el, "Threshold", &gate.threshold);
        }
    }
}

fn encode_band(band: &EqBand) -> Element {
    let mut el = Element::new("Band").with_attr("type", band.band_type.to_string());
    el.set_opt_attr("order", codec::encode_int(band.order));
    el.push(parameter::encode_real(&band.freq, "Freq"));
    push_real(&mut el, "Gain", &band.gain);
    push_real(&mut el, "Q", &band.q);
    push_bool(&mut el, "Enabled", &band.enabled);
    el
}

fn decode_band(el: &Element, ctx: &mut DecodeContext) -> Result<EqBand> {
    let band_type = codec::decode_enum("type", Some(el.required_attr("type")?))?
        .ok_or_else(|| DawError::missing(&el.name, "type"))?;
    Ok(EqBand {
        band_type,
        order: codec::decode_int("order", el.attr("order"))?,
        freq: parameter::decode_real(el.required_child("Freq")?, ctx)?,
        gain: real_slot(el, "Gain", ctx)?,
        q: real_slot(el, "Q", ctx)?,
        enabled: bool_slot(el, "Enabled", ctx)?,
    })
}

/// Decoder for every built-in device tag
pub fn decode_builtin(el: &Element, ctx: &mut DecodeContext) -> Result<Device> {
    let fields = read_fields(el, ctx)?;
    let payload = match el.name.as_str() {
        "Equalizer" => {
            let bands = el
                .children_named("Band")
                .map(|band| decode_band(band, ctx))
                .collect::<Result<Vec<_>>>()?;
            BuiltinPayload::Equalizer(Equalizer {
                bands,
                input_gain: real_slot(el, "InputGain", ctx)?,
                output_gain: real_slot(el, "OutputGain", ctx)?,
            })
        }
        "Compressor" => BuiltinPayload::Compressor(Compressor {
            threshold: real_slot(el, "Threshold", ctx)?,
            ratio: real_slot(el, "Ratio", ctx)?,
            attack: real_slot(el, "Attack", ctx)?,
            release: real_slot(el, "Release", ctx)?,
            input_gain: real_slot(el, "InputGain", ctx)?,
            output_gain: real_slot(el, "OutputGain", ctx)?,
            auto_makeup: bool_slot(el, "AutoMakeup", ctx)?,
        }),
        "Limiter" => BuiltinPayload::Limiter(Limiter {
            threshold: real_slot(el, "Threshold", ctx)?,
            input_gain: real_slot(el, "InputGain", ctx)?,
            output_gain: real_slot(el, "OutputGain", ctx)?,
            attack: real_slot(el, "Attack", ctx)?,
            release: real_slot(el, "Release", ctx)?,
        }),
        "NoiseGate" => BuiltinPayload::NoiseGate(NoiseGate {
            threshold: real_slot(el, "Threshold", ctx)?,
            ratio: real_slot(el, "Ratio", ctx)?,
            attack: real_slot(el, "Attack", ctx)?,
            release: real_slot(el, "Release", ctx)?,
            range: real_slot(el, "Range", ctx)?,
        }),
        _ => BuiltinPayload::Generic,
    };
    Ok(Device::Builtin(BuiltinDevice { fields, payload }))
}

/// Decoder for every plug-in tag
pub fn decode_plugin(el: &Element, ctx: &mut DecodeContext) -> Result<Device> {
    let format = match el.name.as_str() {
        "Vst2Plugin" => PluginFormat::Vst2,
        "Vst3Plugin" => PluginFormat::Vst3,
        "ClapPlugin" => PluginFormat::Clap,
        "AuPlugin" => PluginFormat::Au,
        other => {
            return Err(DawError::UnknownVariant {
                role: "device".to_string(),
                tag: other.to_string(),
            })
        }
    };
    Ok(Device::Plugin(Plugin {
        fields: read_fields(el, ctx)?,
        format,
        plugin_version: el.attr("pluginVersion").map(str::to_string),
    }))
}
