pub mod header;
pub mod model_selector;
pub mod upload_area;
pub mod prediction_list;
