//! Task table and invocation handling
//!
//! An invocation names one [`Task`]; [`request`] turns the raw JSON request
//! into a resolved [`TaskInvocation`] and [`dispatch`] runs its flows.

pub mod dispatch;
pub mod request;

pub use dispatch::{run_task, run_with_deadline, run_without_browser};
pub use request::{InvocationRequest, LocationRef, Response, TaskInvocation};

use crate::domain::BookerError;
use std::fmt;
use std::str::FromStr;

/// Every task an invocation can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Answers without opening a browser
    Test,
    /// All customers
    Customers,
    /// Customers added today
    CustomersToday,
    /// Customers added during the last week
    CustomersLastWeek,
    /// Customers added during the last year
    CustomersLastYear,
    /// Appointments by appointment date (or the requested date type)
    Appointments,
    /// Appointments by booking date
    AppointmentsBooked,
    Orders,
    /// Customers added today, then appointments and orders per location
    Daily,
    /// Recognised but handled by another system
    OrderFromAppointment,
    /// Recognised; the weekly batch has no export flow here
    Weekly,
    /// Recognised; the monthly batch has no export flow here
    Monthly,
    /// Recognised; completed appointments have no saved view here
    CompletedAppointments,
}

const TASKS: [(&str, Task); 14] = [
    ("test", Task::Test),
    ("customers", Task::Customers),
    ("all_customers", Task::Customers),
    ("customers_today", Task::CustomersToday),
    ("customers_last_week", Task::CustomersLastWeek),
    ("customers_last_year", Task::CustomersLastYear),
    ("appointments", Task::Appointments),
    ("appointments_booked", Task::AppointmentsBooked),
    ("orders", Task::Orders),
    ("daily", Task::Daily),
    ("order_from_appointment", Task::OrderFromAppointment),
    ("weekly", Task::Weekly),
    ("monthly", Task::Monthly),
    ("completed_appointments", Task::CompletedAppointments),
];

impl Task {
    pub fn name(self) -> &'static str {
        TASKS
            .iter()
            .find(|(_, task)| *task == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Names of every task, in table order
    pub fn names() -> impl Iterator<Item = &'static str> {
        TASKS.iter().map(|(name, _)| *name)
    }

    /// Whether the task is known but has no implementation
    pub fn is_unsupported(self) -> bool {
        matches!(
            self,
            Task::OrderFromAppointment
                | Task::Weekly
                | Task::Monthly
                | Task::CompletedAppointments
        )
    }

    /// Whether running the task needs a signed-in browser session
    pub fn needs_browser(self) -> bool {
        self != Task::Test && !self.is_unsupported()
    }

    /// Whether the task iterates over locations
    pub fn uses_locations(self) -> bool {
        matches!(
            self,
            Task::Appointments | Task::AppointmentsBooked | Task::Orders | Task::Daily
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Task {
    type Err = BookerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TASKS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, task)| *task)
            .ok_or_else(|| BookerError::Request(format!("Task not found: {s}")))
    }
}
