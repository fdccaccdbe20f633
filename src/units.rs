use crate::LabelError;
use derive_more::{Add, AddAssign, Display, From, Into, Sum};

/// A length in PDF points, where 72 points make up one inch. All geometry in
/// the crate is carried in points; other units convert on the way in.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, AddAssign, Sum, From, Into, Display)]
pub struct Pt(pub f32);

/// A length in inches
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, AddAssign, Sum, From, Into, Display)]
pub struct In(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd, Add, AddAssign, Sum, From, Into, Display)]
pub struct Mm(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Pt {
        Pt(value.0 * 72.0)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Pt {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl std::ops::Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl std::ops::Div<f32> for Pt {
    type Output = Pt;
    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Parse a length value from the label table, accepting an optional unit
/// suffix (`in`, `i`, `cm`, `mm`, `pt`, `pc`, `pica`). A bare number is
/// taken to already be in points.
pub fn parse_length(value: &str) -> Result<Pt, LabelError> {
    let trimmed = value.trim();
    let (number, unit) = match trimmed.find(|ch: char| ch.is_ascii_alphabetic()) {
        Some(at) => trimmed.split_at(at),
        None => (trimmed, ""),
    };
    let number = number
        .trim()
        .parse::<f32>()
        .map_err(|_| LabelError::BadLength(value.to_string()))?;

    match unit {
        "" | "pt" => Ok(Pt(number)),
        "in" | "i" => Ok(In(number).into()),
        "cm" => Ok(Mm(number * 10.0).into()),
        "mm" => Ok(Mm(number).into()),
        "pc" | "pica" => Ok(Pt(number * 12.0)),
        _ => Err(LabelError::BadLength(value.to_string())),
    }
}
