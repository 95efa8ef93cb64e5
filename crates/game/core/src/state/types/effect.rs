use super::{BodyPart, EffectId};

/// Recipe for applying a status effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectData {
    pub id: EffectId,
    /// Duration in turns.
    pub duration: u32,
    /// Body part the effect is bound to; `None` for whole-body effects.
    pub bp: Option<BodyPart>,
    pub permanent: bool,
}

impl EffectData {
    pub fn new(id: impl Into<EffectId>, duration: u32) -> Self {
        Self {
            id: id.into(),
            duration,
            bp: None,
            permanent: false,
        }
    }

    pub fn on(mut self, bp: BodyPart) -> Self {
        self.bp = Some(bp);
        self
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    /// Same effect with its duration scaled, rounding down.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            duration: (self.duration as f32 * factor).max(0.0) as u32,
            ..self.clone()
        }
    }
}
