pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod register;
pub mod set_image;
pub mod show;

use chrono::{NaiveDate, NaiveTime};
use clap::Args;

use crate::input::flag;

/// Event fields that can be given as flags to `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Date (YYYY-MM-DD)
    #[arg(long, value_parser = flag::date)]
    pub date: Option<NaiveDate>,

    /// Start time (HH:MM, 24-hour)
    #[arg(long, value_parser = flag::time)]
    pub time: Option<NaiveTime>,

    #[arg(long)]
    pub capacity: Option<u32>,

    /// Cost, e.g. 10, $12.50 or "free"
    #[arg(long, value_parser = flag::cost)]
    pub cost: Option<f64>,

    /// Header image path
    #[arg(long)]
    pub image: Option<String>,
}
