use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};

use super::errors::DomainError;
use super::ports::OrderCallbacks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Standard,
    #[default]
    Urgent,
    Scheduled,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Standard => write!(f, "standard"),
            Priority::Urgent => write!(f, "urgent"),
            Priority::Scheduled => write!(f, "scheduled"),
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Priority::Standard),
            "urgent" => Ok(Priority::Urgent),
            "scheduled" => Ok(Priority::Scheduled),
            _ => Err(DomainError::InvalidInput(format!(
                "Invalid priority: {}. Use standard, urgent, or scheduled",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Invoice30,
    Invoice60,
    CreditCard,
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Invoice30,
        PaymentMethod::Invoice60,
        PaymentMethod::CreditCard,
        PaymentMethod::BankTransfer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Invoice30 => "Invoice 30 days",
            PaymentMethod::Invoice60 => "Invoice 60 days",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::BankTransfer => "Bank transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.label() == s)
            .ok_or_else(|| DomainError::InvalidInput(format!("Unknown payment method: {}", s)))
    }
}

/// Order metadata captured on the confirmation step.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderData {
    pub order_name: String,
    /// `YYYY-MM-DD`; not validated.
    pub expected_delivery_date: String,
    pub notes: String,
    pub priority: Priority,
    pub payment_method: PaymentMethod,
    pub save_as_template: bool,
    pub notify_on_delivery: bool,
}

impl OrderData {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            order_name: String::new(),
            expected_delivery_date: today.format("%Y-%m-%d").to_string(),
            notes: String::new(),
            priority: Priority::default(),
            payment_method: PaymentMethod::default(),
            save_as_template: false,
            notify_on_delivery: false,
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.order_name.trim().is_empty()
    }
}

impl Default for OrderData {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// A single user edit. Each variant updates exactly one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    OrderName(String),
    ExpectedDeliveryDate(String),
    Notes(String),
    Priority(Priority),
    PaymentMethod(PaymentMethod),
    SaveAsTemplate(bool),
    NotifyOnDelivery(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Blocked,
}

/// Form state for one confirmation session.
#[derive(Debug, Clone, Default)]
pub struct OrderFormState {
    data: OrderData,
}

impl OrderFormState {
    pub fn new(data: OrderData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &OrderData {
        &self.data
    }

    pub fn apply(&mut self, event: FormEvent) {
        let data = &mut self.data;
        match event {
            FormEvent::OrderName(v) => data.order_name = v,
            FormEvent::ExpectedDeliveryDate(v) => data.expected_delivery_date = v,
            FormEvent::Notes(v) => data.notes = v,
            FormEvent::Priority(v) => data.priority = v,
            FormEvent::PaymentMethod(v) => data.payment_method = v,
            FormEvent::SaveAsTemplate(v) => data.save_as_template = v,
            FormEvent::NotifyOnDelivery(v) => data.notify_on_delivery = v,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.data.is_submittable()
    }

    /// Hands a snapshot of the form to the workflow and closes. Does nothing
    /// while the order name is blank.
    pub fn submit<C: OrderCallbacks + ?Sized>(&self, callbacks: &mut C) -> SubmitOutcome {
        if !self.can_submit() {
            log::debug!("submit ignored: order name is blank");
            return SubmitOutcome::Blocked;
        }
        callbacks.on_submit_order(self.data.clone());
        callbacks.on_close();
        SubmitOutcome::Submitted
    }

    pub fn save_draft<C: OrderCallbacks + ?Sized>(&self, callbacks: &mut C) {
        callbacks.on_save_as_draft();
        callbacks.on_close();
    }

    pub fn dismiss<C: OrderCallbacks + ?Sized>(&self, callbacks: &mut C) {
        callbacks.on_close();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingCallbacks {
        pub calls: Vec<&'static str>,
        pub submitted: Vec<OrderData>,
    }

    impl OrderCallbacks for RecordingCallbacks {
        fn on_save_as_draft(&mut self) {
            self.calls.push("draft");
        }

        fn on_submit_order(&mut self, order: OrderData) {
            self.calls.push("submit");
            self.submitted.push(order);
        }

        fn on_close(&mut self) {
            self.calls.push("close");
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn new_form_has_session_defaults() {
        let data = OrderData::new(today());

        assert_eq!(data.expected_delivery_date, "2026-10-19");
        assert_eq!(data.priority, Priority::Urgent);
        assert_eq!(data.payment_method.to_string(), "Invoice 30 days");
        assert!(data.order_name.is_empty());
        assert!(!data.save_as_template);
        assert!(!data.notify_on_delivery);
    }

    #[test]
    fn each_event_touches_only_its_field() {
        let mut form = OrderFormState::new(OrderData::new(today()));
        let before = form.data().clone();

        form.apply(FormEvent::Notes("Deliver to dock B".to_string()));
        assert_eq!(form.data().notes, "Deliver to dock B");
        assert_eq!(
            OrderData {
                notes: before.notes.clone(),
                ..form.data().clone()
            },
            before
        );

        form.apply(FormEvent::Priority(Priority::Scheduled));
        form.apply(FormEvent::PaymentMethod(PaymentMethod::BankTransfer));
        form.apply(FormEvent::SaveAsTemplate(true));
        form.apply(FormEvent::NotifyOnDelivery(true));
        form.apply(FormEvent::ExpectedDeliveryDate("not a date".to_string()));

        let data = form.data();
        assert_eq!(data.priority, Priority::Scheduled);
        assert_eq!(data.payment_method, PaymentMethod::BankTransfer);
        assert!(data.save_as_template);
        assert!(data.notify_on_delivery);
        assert_eq!(data.expected_delivery_date, "not a date");
        assert_eq!(data.notes, "Deliver to dock B");
        assert!(data.order_name.is_empty());
    }

    #[test]
    fn whitespace_name_blocks_submit() {
        let mut form = OrderFormState::new(OrderData::new(today()));
        form.apply(FormEvent::OrderName("   ".to_string()));
        let mut callbacks = RecordingCallbacks::default();

        assert!(!form.can_submit());
        assert_eq!(form.submit(&mut callbacks), SubmitOutcome::Blocked);
        assert!(callbacks.calls.is_empty());
    }

    #[test]
    fn submit_hands_over_snapshot_then_closes() {
        let mut form = OrderFormState::new(OrderData::new(today()));
        form.apply(FormEvent::OrderName("PO-42".to_string()));
        let mut callbacks = RecordingCallbacks::default();

        assert!(form.can_submit());
        assert_eq!(form.submit(&mut callbacks), SubmitOutcome::Submitted);
        assert_eq!(callbacks.calls, vec!["submit", "close"]);
        assert_eq!(callbacks.submitted[0].order_name, "PO-42");
    }

    #[test]
    fn draft_is_always_allowed() {
        let form = OrderFormState::new(OrderData::new(today()));
        let mut callbacks = RecordingCallbacks::default();

        form.save_draft(&mut callbacks);

        assert_eq!(callbacks.calls, vec!["draft", "close"]);
    }

    #[test]
    fn dismiss_only_closes() {
        let form = OrderFormState::default();
        let mut callbacks = RecordingCallbacks::default();

        form.dismiss(&mut callbacks);

        assert_eq!(callbacks.calls, vec!["close"]);
    }

    #[test]
    fn payment_method_round_trips_through_label() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.label().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!("Cash".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn priority_parses_any_case() {
        assert_eq!("URGENT".parse::<Priority>().unwrap(), Priority::Urgent);
        assert_eq!(Priority::Scheduled.to_string(), "scheduled");
        assert!("asap".parse::<Priority>().is_err());
    }
}
