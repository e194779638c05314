pub mod help;
pub mod input_box;
pub mod message_box;
pub mod stats_bar;
pub mod status_bar;
pub mod upcoming_list;

pub use help::Help;
pub use input_box::InputBox;
pub use message_box::MessageBox;
pub use stats_bar::StatsBar;
pub use status_bar::StatusBar;
pub use upcoming_list::UpcomingList;
