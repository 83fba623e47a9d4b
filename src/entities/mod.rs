//! Entity type definitions
//!
//! - [`ReceivingForm`] - one receiving submission (operator, supplier, quantities)
//! - [`InspectionRecord`] - the flattened row saved to the register

pub mod inspection;

pub use inspection::{
    InspectionRecord, Presentation, PresentationFields, QualityVerdict, ReceivingForm,
    WorkflowError,
};
