//! Progress displays for running rounds
//!
//! - [`live::LiveRoundView`] polls round snapshots and draws one spinner per provider
//! - [`reporter::SimpleProgress`] prints one line per event via the progress port

pub mod live;
pub mod reporter;
