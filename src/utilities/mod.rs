pub mod priority_list;

pub use priority_list::PriorityList;
