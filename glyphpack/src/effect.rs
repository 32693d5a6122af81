// Copyright 2026 the Glyphpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual effect chain configuration.
//!
//! Effects are configuration the rasterizer composites while producing glyph
//! pixels; their pixel-level algorithms live in the rasterization backend.
//! What the core models is the ordered chain itself: each effect declares
//! its kind through a tagged variant and exposes a plain parameter schema
//! (name, type, bounds, description) that any front end — CLI flags, a
//! settings file, a GUI — can bind to. Inter-effect queries go through
//! typed accessors: a shadow asks the chain whether an outline precedes it
//! instead of downcasting its neighbors.

/// The kind of a visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// Solid fill color.
    Color,
    /// Vertical two-stop gradient fill.
    Gradient,
    /// Stroked outline around the glyph shape.
    Outline,
    /// Outline with a hand-drawn wobble.
    OutlineWobble,
    /// Outline with a zigzag edge.
    OutlineZigzag,
    /// Blurred drop shadow behind the glyph.
    Shadow,
    /// Signed-distance-field post-process.
    DistanceField,
    /// Convolution filter pass.
    Filter,
}

/// Value type and bounds of one effect parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamKind {
    /// An RGB color, written as `rrggbb` hex.
    Color,
    /// A float within the inclusive bounds.
    Float {
        /// Smallest accepted value.
        min: f32,
        /// Largest accepted value.
        max: f32,
    },
    /// A non-negative integer.
    Int,
    /// `true` or `false`.
    Bool,
    /// One of a fixed set of options.
    Choice(&'static [&'static str]),
}

/// Schema entry for one configurable effect parameter.
#[derive(Clone, Copy, Debug)]
pub struct EffectParam {
    /// Parameter name as it appears in settings files.
    pub name: &'static str,
    /// Value type and bounds.
    pub kind: ParamKind,
    /// Default value, in the same string form settings files use.
    pub default: &'static str,
    /// Human-readable description for front ends.
    pub description: &'static str,
}

const COLOR: EffectParam = EffectParam {
    name: "color",
    kind: ParamKind::Color,
    default: "ffffff",
    description: "Color of the effect.",
};

const COLOR_PARAMS: &[EffectParam] = &[COLOR];

const GRADIENT_PARAMS: &[EffectParam] = &[
    EffectParam {
        name: "top-color",
        kind: ParamKind::Color,
        default: "ffffff",
        description: "Color of the top of the gradient.",
    },
    EffectParam {
        name: "bottom-color",
        kind: ParamKind::Color,
        default: "000000",
        description: "Color of the bottom of the gradient.",
    },
    EffectParam {
        name: "offset",
        kind: ParamKind::Int,
        default: "0",
        description: "Moves the gradient up or down, in pixels.",
    },
    EffectParam {
        name: "scale",
        kind: ParamKind::Float { min: 0.0, max: 10.0 },
        default: "1",
        description: "Changes the height of the gradient by a percentage of the glyph height.",
    },
    EffectParam {
        name: "cyclic",
        kind: ParamKind::Bool,
        default: "false",
        description: "Whether the gradient repeats.",
    },
];

const OUTLINE_WIDTH: EffectParam = EffectParam {
    name: "width",
    kind: ParamKind::Float {
        min: 0.1,
        max: 999.0,
    },
    default: "2",
    description: "Width of the outline stroke.",
};

const OUTLINE_PARAMS: &[EffectParam] = &[
    COLOR,
    OUTLINE_WIDTH,
    EffectParam {
        name: "join",
        kind: ParamKind::Choice(&["bevel", "miter", "round"]),
        default: "bevel",
        description: "How corners of the outline are joined.",
    },
];

const OUTLINE_WOBBLE_PARAMS: &[EffectParam] = &[
    COLOR,
    OUTLINE_WIDTH,
    EffectParam {
        name: "detail",
        kind: ParamKind::Float { min: 1.0, max: 50.0 },
        default: "2",
        description: "Level of detail of the wobble; smaller is more deformed.",
    },
    EffectParam {
        name: "amplitude",
        kind: ParamKind::Float { min: 0.5, max: 50.0 },
        default: "2",
        description: "Amplitude of the wobble.",
    },
];

const OUTLINE_ZIGZAG_PARAMS: &[EffectParam] = &[
    COLOR,
    OUTLINE_WIDTH,
    EffectParam {
        name: "wavelength",
        kind: ParamKind::Float {
            min: 1.0,
            max: 100.0,
        },
        default: "3",
        description: "Wavelength of the zigzag edge.",
    },
    EffectParam {
        name: "amplitude",
        kind: ParamKind::Float { min: 0.5, max: 50.0 },
        default: "1",
        description: "Amplitude of the zigzag edge.",
    },
];

const SHADOW_PARAMS: &[EffectParam] = &[
    EffectParam {
        name: "color",
        kind: ParamKind::Color,
        default: "000000",
        description: "Color of the shadow.",
    },
    EffectParam {
        name: "opacity",
        kind: ParamKind::Float { min: 0.0, max: 1.0 },
        default: "0.6",
        description: "Translucency of the shadow.",
    },
    EffectParam {
        name: "x-distance",
        kind: ParamKind::Float {
            min: -99.0,
            max: 99.0,
        },
        default: "2",
        description: "Horizontal offset of the shadow, in pixels.",
    },
    EffectParam {
        name: "y-distance",
        kind: ParamKind::Float {
            min: -99.0,
            max: 99.0,
        },
        default: "2",
        description: "Vertical offset of the shadow, in pixels.",
    },
    EffectParam {
        name: "blur-kernel-size",
        kind: ParamKind::Choice(&["0", "3", "5", "7", "9", "11"]),
        default: "0",
        description: "Size of the blur kernel; zero disables the blur.",
    },
    EffectParam {
        name: "blur-passes",
        kind: ParamKind::Int,
        default: "1",
        description: "Number of blur passes.",
    },
];

const DISTANCE_FIELD_PARAMS: &[EffectParam] = &[
    COLOR,
    EffectParam {
        name: "scale",
        kind: ParamKind::Int,
        default: "1",
        description: "Downsampling factor applied after the field is computed.",
    },
    EffectParam {
        name: "spread",
        kind: ParamKind::Float {
            min: 1.0,
            max: f32::MAX,
        },
        default: "4",
        description: "Distance in pixels from the edge at which the field saturates.",
    },
];

impl EffectKind {
    /// The parameter schema for this effect kind.
    pub fn params(self) -> &'static [EffectParam] {
        match self {
            Self::Color => COLOR_PARAMS,
            Self::Gradient => GRADIENT_PARAMS,
            Self::Outline => OUTLINE_PARAMS,
            Self::OutlineWobble => OUTLINE_WOBBLE_PARAMS,
            Self::OutlineZigzag => OUTLINE_ZIGZAG_PARAMS,
            Self::Shadow => SHADOW_PARAMS,
            Self::DistanceField => DISTANCE_FIELD_PARAMS,
            Self::Filter => &[],
        }
    }

    /// The settings-file name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Gradient => "gradient",
            Self::Outline => "outline",
            Self::OutlineWobble => "outline-wobble",
            Self::OutlineZigzag => "outline-zigzag",
            Self::Shadow => "shadow",
            Self::DistanceField => "distance-field",
            Self::Filter => "filter",
        }
    }

    /// Parses a settings-file kind name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "color" => Some(Self::Color),
            "gradient" => Some(Self::Gradient),
            "outline" => Some(Self::Outline),
            "outline-wobble" => Some(Self::OutlineWobble),
            "outline-zigzag" => Some(Self::OutlineZigzag),
            "shadow" => Some(Self::Shadow),
            "distance-field" => Some(Self::DistanceField),
            "filter" => Some(Self::Filter),
            _ => None,
        }
    }

    /// Whether this kind strokes an outline around the glyph shape.
    pub fn is_outline(self) -> bool {
        matches!(self, Self::Outline | Self::OutlineWobble | Self::OutlineZigzag)
    }
}

/// One configured effect: its kind plus current parameter values.
///
/// Values are kept in the schema's string form; the rasterization backend
/// interprets them when compositing.
#[derive(Clone, Debug)]
pub struct Effect {
    kind: EffectKind,
    values: Vec<(&'static str, String)>,
}

impl Effect {
    /// Creates an effect with every parameter at its schema default.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            values: kind
                .params()
                .iter()
                .map(|p| (p.name, p.default.to_owned()))
                .collect(),
        }
    }

    /// This effect's kind.
    #[inline]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Current value of a parameter, if the schema has it.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a parameter value. Returns `false` when the schema has no
    /// parameter of that name; the value is left untouched in that case.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => {
                *v = value.to_owned();
                true
            }
            None => false,
        }
    }

    /// Parameter names and current values, in schema order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(n, v)| (*n, v.as_str()))
    }
}

/// An ordered chain of effects applied while rasterizing each glyph.
#[derive(Clone, Debug, Default)]
pub struct EffectChain {
    effects: Vec<Effect>,
}

impl EffectChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an effect to the chain.
    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// The effects in application order.
    #[inline]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Mutable access to the effects, for front ends binding parameters.
    #[inline]
    pub fn effects_mut(&mut self) -> &mut [Effect] {
        &mut self.effects
    }

    /// Whether the chain is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Whether any outline-kind effect precedes `index` in the chain.
    ///
    /// A shadow composites differently when an outline will be drawn over
    /// it; this is the query it uses instead of inspecting its neighbors'
    /// concrete types.
    pub fn has_outline_before(&self, index: usize) -> bool {
        self.effects[..index.min(self.effects.len())]
            .iter()
            .any(|e| e.kind().is_outline())
    }
}
