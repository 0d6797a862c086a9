use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// Scale applied to every vertex, either the same on all axes or per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScaleFactor {
    Uniform(f64),
    PerAxis([f64; 3]),
}

impl ScaleFactor {
    /// Accepts exactly one component (uniform) or three (x, y, z).
    pub fn from_components(components: &[f64]) -> Result<Self, MeshError> {
        check_finite("scale factor", components)?;
        match *components {
            [s] => Ok(Self::Uniform(s)),
            [x, y, z] => Ok(Self::PerAxis([x, y, z])),
            _ => Err(MeshError::InvalidArgument {
                reason: format!(
                    "scale factor must have 1 or 3 components, got {}",
                    components.len()
                ),
            }),
        }
    }

    /// Factor per axis.
    pub fn axes(&self) -> [f64; 3] {
        match *self {
            Self::Uniform(s) => [s; 3],
            Self::PerAxis(a) => a,
        }
    }
}

impl TryFrom<&[f64]> for ScaleFactor {
    type Error = MeshError;

    fn try_from(components: &[f64]) -> Result<Self, Self::Error> {
        Self::from_components(components)
    }
}

/// Offset added to every vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation(pub [f64; 3]);

impl Translation {
    pub fn from_components(components: &[f64]) -> Result<Self, MeshError> {
        check_finite("translation", components)?;
        match *components {
            [x, y, z] => Ok(Self([x, y, z])),
            _ => Err(MeshError::InvalidArgument {
                reason: format!(
                    "translation must have exactly 3 components, got {}",
                    components.len()
                ),
            }),
        }
    }

    pub fn inverse(&self) -> Self {
        Self([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl TryFrom<&[f64]> for Translation {
    type Error = MeshError;

    fn try_from(components: &[f64]) -> Result<Self, Self::Error> {
        Self::from_components(components)
    }
}

fn check_finite(what: &str, components: &[f64]) -> Result<(), MeshError> {
    if let Some(bad) = components.iter().find(|c| !c.is_finite()) {
        return Err(MeshError::InvalidArgument {
            reason: format!("{what} component {bad} is not finite"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_arity() {
        assert_eq!(
            ScaleFactor::from_components(&[2.0]).unwrap(),
            ScaleFactor::Uniform(2.0)
        );
        assert_eq!(
            ScaleFactor::from_components(&[1.0, 2.0, 3.0]).unwrap().axes(),
            [1.0, 2.0, 3.0]
        );
        assert!(ScaleFactor::from_components(&[]).is_err());
        assert!(ScaleFactor::from_components(&[1.0, 2.0]).is_err());
        assert!(ScaleFactor::from_components(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn translation_arity() {
        assert!(Translation::from_components(&[1.0, 2.0, 3.0]).is_ok());
        let err = Translation::from_components(&[1.0]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidArgument { .. }));
        assert!(Translation::try_from(&[0.0, 0.0][..]).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(ScaleFactor::from_components(&[f64::NAN]).is_err());
        assert!(Translation::from_components(&[0.0, f64::INFINITY, 0.0]).is_err());
    }
}
