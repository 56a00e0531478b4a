use std::sync::Arc;

use crate::application::list::MyListService;

#[derive(Clone)]
pub struct HttpState {
    pub list: Arc<MyListService>,
}

impl HttpState {
    pub fn new(list: Arc<MyListService>) -> Self {
        Self { list }
    }
}
