//! Orders
//!
//! Orders are created at checkout by the backend. After that the only thing
//! that changes is the fulfilment status, one step at a time:
//!
//! ```text
//! pending -> confirmed -> processing -> shipped -> delivered
//!    \           \             \           \
//!     `-----------`-------------`-----------`--> cancelled
//! ```

mod order;
mod payment;
mod status;

pub use order::{Order, OrderDetails, OrderId, OrderItem, PlannedTransition};
pub use payment::PaymentStatus;
pub use status::{InvalidTransition, OrderAction, OrderActions, OrderStatus, UnknownStatus};
