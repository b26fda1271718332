use thiserror::Error;

const RATED_LABEL: &str = "Rated";
const OUTLINE_CLASS: &str = "btn-outline";
const RATED_CLASS: &str = "btn-rated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateControlId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateControl {
    pub id: RateControlId,
    pub forwarder_name: String,
    pub item_name: String,
    pub label: String,
    pub disabled: bool,
    pub classes: Vec<String>,
}

impl RateControl {
    pub fn new(
        id: RateControlId,
        forwarder_name: impl Into<String>,
        item_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            forwarder_name: forwarder_name.into(),
            item_name: item_name.into(),
            label: "Rate".to_string(),
            disabled: false,
            classes: vec!["btn-rate-forwarder".to_string(), OUTLINE_CLASS.to_string()],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn mark_rated(&mut self) -> bool {
        if self.disabled && self.label == RATED_LABEL {
            return false;
        }
        self.label = RATED_LABEL.to_string();
        self.disabled = true;
        self.classes.retain(|class| class != OUTLINE_CLASS);
        if !self.has_class(RATED_CLASS) {
            self.classes.push(RATED_CLASS.to_string());
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Overall,
    Price,
    Speed,
    Stability,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Overall,
        Criterion::Price,
        Criterion::Speed,
        Criterion::Stability,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            Criterion::Overall => "overall_rating",
            Criterion::Price => "price_rating",
            Criterion::Speed => "speed_rating",
            Criterion::Stability => "stability_rating",
        }
    }

    fn index(self) -> usize {
        match self {
            Criterion::Overall => 0,
            Criterion::Price => 1,
            Criterion::Speed => 2,
            Criterion::Stability => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stars(u8);

impl Stars {
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=Self::MAX).contains(&value) {
            Ok(Stars(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating modal is not open")]
    NotOpen,
    #[error("rate control {0:?} is disabled")]
    ControlDisabled(RateControlId),
    #[error("a rating must be between 1 and 5 stars, got {0}")]
    OutOfRange(u8),
    #[error("Please rate every category.")]
    Incomplete { missing: Vec<Criterion> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingPrompt {
    pub forwarder_name: String,
    pub item_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSubmission {
    pub control: RateControlId,
    pub forwarder_name: String,
    pub item_name: String,
    pub overall: Stars,
    pub price: Stars,
    pub speed: Stars,
    pub stability: Stars,
}

#[derive(Debug, Clone)]
struct PendingRating {
    control: RateControlId,
    forwarder_name: String,
    item_name: String,
}

#[derive(Debug, Default)]
pub struct RatingModal {
    pending: Option<PendingRating>,
    ratings: [Option<Stars>; 4],
}

impl RatingModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_control(&self) -> Option<RateControlId> {
        self.pending.as_ref().map(|pending| pending.control)
    }

    pub fn open(&mut self, control: &RateControl) -> Result<RatingPrompt, RatingError> {
        if control.disabled {
            return Err(RatingError::ControlDisabled(control.id));
        }
        self.pending = Some(PendingRating {
            control: control.id,
            forwarder_name: control.forwarder_name.clone(),
            item_name: control.item_name.clone(),
        });
        self.ratings = [None; 4];
        Ok(RatingPrompt {
            forwarder_name: control.forwarder_name.clone(),
            item_label: format!("'{}'", control.item_name),
        })
    }

    pub fn select(&mut self, criterion: Criterion, stars: u8) -> Result<(), RatingError> {
        if !self.is_open() {
            return Err(RatingError::NotOpen);
        }
        self.ratings[criterion.index()] = Some(Stars::try_from(stars)?);
        Ok(())
    }

    pub fn rating(&self, criterion: Criterion) -> Option<Stars> {
        self.ratings[criterion.index()]
    }

    /// Completes the rating when every criterion has stars. On
    /// [`RatingError::Incomplete`] the modal stays open with its selection.
    pub fn submit(&mut self) -> Result<RatingSubmission, RatingError> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(RatingError::NotOpen);
        };
        let [Some(overall), Some(price), Some(speed), Some(stability)] = self.ratings else {
            let missing = Criterion::ALL
                .into_iter()
                .filter(|criterion| self.rating(*criterion).is_none())
                .collect();
            return Err(RatingError::Incomplete { missing });
        };

        let submission = RatingSubmission {
            control: pending.control,
            forwarder_name: pending.forwarder_name.clone(),
            item_name: pending.item_name.clone(),
            overall,
            price,
            speed,
            stability,
        };
        self.close();
        Ok(submission)
    }

    pub fn close(&mut self) {
        self.pending = None;
        self.ratings = [None; 4];
    }
}

#[cfg(test)]
#[path = "tests/rating_tests.rs"]
mod tests;
