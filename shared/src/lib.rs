pub mod logging;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Output classes of the Fashion-MNIST model, in export order.
///
/// The discriminant is the class identifier used on the wire and in the
/// batch CSV, so variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumCountMacro)]
pub enum FashionClass {
    #[strum(serialize = "T-shirt/top")]
    TShirtTop,
    #[strum(serialize = "Trouser")]
    Trouser,
    #[strum(serialize = "Pullover")]
    Pullover,
    #[strum(serialize = "Dress")]
    Dress,
    #[strum(serialize = "Coat")]
    Coat,
    #[strum(serialize = "Sandal")]
    Sandal,
    #[strum(serialize = "Shirt")]
    Shirt,
    #[strum(serialize = "Sneaker")]
    Sneaker,
    #[strum(serialize = "Bag")]
    Bag,
    #[strum(serialize = "Ankle boot")]
    AnkleBoot,
}

pub const CLASS_COUNT: usize = FashionClass::COUNT;

impl FashionClass {
    pub fn from_id(class_id: usize) -> Option<Self> {
        Self::iter().nth(class_id)
    }

    pub fn id(self) -> usize {
        self as usize
    }

    pub fn labels() -> Vec<String> {
        Self::iter().map(|class| class.to_string()).collect()
    }
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictResponse {
    pub probabilities: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "up".to_string(),
        }
    }
}
