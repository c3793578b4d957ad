//! Closed enumerations used by attributes

use serde::{Deserialize, Serialize};

use crate::codec::WireEnum;

/// Declares a wire enumeration together with its `WireEnum` impl.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl WireEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[$($name::$variant),+];

            fn as_wire(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_wire())
            }
        }
    };
}

wire_enum! {
    /// Unit of a real parameter or automation lane
    Unit {
        Linear => "linear",
        Normalized => "normalized",
        Percent => "percent",
        Decibel => "decibel",
        Hertz => "hertz",
        Semitones => "semitones",
        Seconds => "seconds",
        Beats => "beats",
        Bpm => "bpm",
    }
}

wire_enum! {
    /// Role of a channel in the mixer
    MixerRole {
        Regular => "regular",
        Master => "master",
        Effect => "effect",
        Submix => "submix",
        Vca => "vca",
    }
}

wire_enum! {
    ContentType {
        Audio => "audio",
        Automation => "automation",
        Notes => "notes",
        Video => "video",
        Markers => "markers",
        Tracks => "tracks",
    }
}

wire_enum! {
    TimeUnit {
        Beats => "beats",
        Seconds => "seconds",
    }
}

wire_enum! {
    Interpolation {
        Hold => "hold",
        Linear => "linear",
    }
}

wire_enum! {
    /// Per-note or per-channel expression an automation lane can target
    ExpressionType {
        Gain => "gain",
        Pan => "pan",
        Transpose => "transpose",
        Timbre => "timbre",
        Formant => "formant",
        Pressure => "pressure",
        ChannelController => "channelController",
        ChannelPressure => "channelPressure",
        PolyPressure => "polyPressure",
        PitchBend => "pitchBend",
        ProgramChange => "programChange",
    }
}

wire_enum! {
    EqBandType {
        HighPass => "highPass",
        LowPass => "lowPass",
        BandPass => "bandPass",
        HighShelf => "highShelf",
        LowShelf => "lowShelf",
        Bell => "bell",
        Notch => "notch",
    }
}

wire_enum! {
    DeviceRole {
        Instrument => "instrument",
        NoteFx => "noteFX",
        AudioFx => "audioFX",
        Analyzer => "analyzer",
    }
}

wire_enum! {
    /// Whether a send taps the signal before or after the channel fader
    SendType {
        Pre => "pre",
        Post => "post",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(DeviceRole::Instrument, "instrument")]
    #[test_case(DeviceRole::NoteFx, "noteFX")]
    #[test_case(DeviceRole::AudioFx, "audioFX")]
    #[test_case(DeviceRole::Analyzer, "analyzer")]
    fn test_device_role_tokens(role: DeviceRole, token: &str) {
        assert_eq!(role.as_wire(), token);
        assert_eq!(DeviceRole::from_wire(token), Some(role));
    }

    #[test]
    fn test_camel_case_tokens() {
        assert_eq!(
            ExpressionType::from_wire("channelController"),
            Some(ExpressionType::ChannelController)
        );
        assert_eq!(EqBandType::HighShelf.to_string(), "highShelf");
        assert_eq!(Unit::from_wire("BPM"), None);
    }

    #[test]
    fn test_every_variant_maps_back() {
        for role in MixerRole::VARIANTS {
            assert_eq!(MixerRole::from_wire(role.as_wire()), Some(*role));
        }
        assert_eq!(ExpressionType::VARIANTS.len(), 11);
    }

    #[test]
    fn test_serde_uses_wire_tokens() {
        let json = serde_json::to_string(&DeviceRole::AudioFx).unwrap();
        assert_eq!(json, "\"audioFX\"");
    }
}
