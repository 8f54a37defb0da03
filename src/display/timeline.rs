//! Customer-facing order timeline

use std::io;

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::{
    display::{RenderError, format_timestamp},
    orders::{Order, OrderStatus},
};

/// How far the order has got relative to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Already reached
    Complete,

    /// Where the order is now
    Current,

    /// Not reached yet
    Upcoming,
}

impl StepState {
    const fn marker(self) -> &'static str {
        match self {
            Self::Complete => "[x]",
            Self::Current => "[>]",
            Self::Upcoming => "[ ]",
        }
    }
}

/// One step of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineStep {
    /// Status the step represents
    pub status: OrderStatus,

    /// Step title
    pub title: &'static str,

    /// Progress marker
    pub state: StepState,

    /// When the step happened, if recorded
    pub at: Option<Timestamp>,
}

/// Ordered steps from placement to delivery (or cancellation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTimeline {
    steps: SmallVec<[TimelineStep; 6]>,
}

impl OrderTimeline {
    /// Build the timeline for an order.
    pub fn for_order(order: &Order) -> Self {
        let steps = match order.status().stage() {
            Some(current) => Self::forward_steps(order, current),
            None => Self::cancelled_steps(order),
        };

        Self { steps }
    }

    /// Steps in display order.
    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    /// Render one step per line.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), RenderError> {
        for step in &self.steps {
            match step.at {
                Some(at) => writeln!(
                    out,
                    "{} {:<14} {}",
                    step.state.marker(),
                    step.title,
                    format_timestamp(at)
                )?,
                None => writeln!(out, "{} {}", step.state.marker(), step.title)?,
            }
        }

        Ok(())
    }

    fn forward_steps(order: &Order, current: usize) -> SmallVec<[TimelineStep; 6]> {
        let delivered = order.status() == OrderStatus::Delivered;

        OrderStatus::ALL
            .into_iter()
            .filter_map(|status| status.stage().map(|stage| (status, stage)))
            .map(|(status, stage)| {
                let state = if stage < current || delivered {
                    StepState::Complete
                } else if stage == current {
                    StepState::Current
                } else {
                    StepState::Upcoming
                };

                TimelineStep {
                    status,
                    title: step_title(status),
                    state,
                    at: recorded_at(order, status),
                }
            })
            .collect()
    }

    fn cancelled_steps(order: &Order) -> SmallVec<[TimelineStep; 6]> {
        let mut steps = SmallVec::new();

        steps.push(TimelineStep {
            status: OrderStatus::Pending,
            title: step_title(OrderStatus::Pending),
            state: StepState::Complete,
            at: Some(order.created_at()),
        });

        if let Some(at) = order.shipped_at() {
            steps.push(TimelineStep {
                status: OrderStatus::Shipped,
                title: step_title(OrderStatus::Shipped),
                state: StepState::Complete,
                at: Some(at),
            });
        }

        steps.push(TimelineStep {
            status: OrderStatus::Cancelled,
            title: step_title(OrderStatus::Cancelled),
            state: StepState::Current,
            at: None,
        });

        steps
    }
}

const fn step_title(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order placed",
        OrderStatus::Confirmed => "Confirmed",
        OrderStatus::Processing => "Processing",
        OrderStatus::Shipped => "Shipped",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

fn recorded_at(order: &Order, status: OrderStatus) -> Option<Timestamp> {
    match status {
        OrderStatus::Pending => Some(order.created_at()),
        OrderStatus::Shipped => order.shipped_at(),
        OrderStatus::Delivered => order.delivered_at(),
        _ => None,
    }
}
