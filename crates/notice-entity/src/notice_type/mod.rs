//! Notice type entities.

pub mod model;

pub use model::{
    CreateNoticeType, DEFAULT_SENSITIVITY, DESCRIPTION_MAX_LEN, DISPLAY_MAX_LEN, LABEL_MAX_LEN,
    NoticeType,
};
