use std::sync::Arc;

use binday_core::{LookupRequest, LookupResult, service::BinDayService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    PostcodeEntry,
    AddressEntry,
    ScheduleView,
}

pub(crate) struct App {
    pub service: Arc<BinDayService>,

    pub screen: Screen,
    pub postcode_input: String,
    pub address_input: String,
    pub debug: bool,

    pub result: Option<LookupResult>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<BinDayService>, debug: bool) -> Self {
        Self {
            service,
            screen: Screen::PostcodeEntry,
            postcode_input: String::new(),
            address_input: String::new(),
            debug,
            result: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn request(&self) -> LookupRequest {
        let hint = Some(self.address_input.trim()).filter(|hint| !hint.is_empty());
        LookupRequest::new(self.postcode_input.trim(), hint).with_debug(self.debug)
    }

    pub(crate) fn input_mut(&mut self) -> Option<&mut String> {
        match self.screen {
            Screen::PostcodeEntry => Some(&mut self.postcode_input),
            Screen::AddressEntry => Some(&mut self.address_input),
            Screen::ScheduleView => None,
        }
    }

    pub(crate) fn show_schedule(&mut self, result: LookupResult) {
        self.result = Some(result);
        self.error_message = None;
        self.screen = Screen::ScheduleView;
    }

    pub(crate) fn show_error(&mut self, message: String) {
        self.result = None;
        self.error_message = Some(message);
        self.screen = Screen::ScheduleView;
    }
}
