//! The per-render view frame.
//!
//! While the component runtime constructs a view, the executing factory
//! needs to know *where in the tree* it is running so its dependencies can
//! be resolved against the node-injector hierarchy. That location is the
//! view frame, held in a process-wide slot with the same scoped-acquisition
//! discipline as the injector context.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use weft_core::injector::{NodeId, ViewResolver};

use crate::instruction::view_inject;
use crate::switch::{self, InjectImpl};

/// Where in the component tree construction is currently executing.
///
/// The resolver is the render context itself; `node` is the tree position
/// whose factory is running.
#[derive(Clone)]
pub struct ViewFrame {
    /// The node-injector tree walker for the view under construction.
    pub resolver: Arc<dyn ViewResolver>,
    /// The node whose factory is executing.
    pub node: NodeId,
}

impl fmt::Debug for ViewFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFrame")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

thread_local! {
    static CURRENT_VIEW: RefCell<Option<ViewFrame>> = const { RefCell::new(None) };
}

/// The frame construction is currently executing under, if any.
#[must_use]
pub fn current_view() -> Option<ViewFrame> {
    CURRENT_VIEW.with(|slot| slot.borrow().clone())
}

/// Establishes `frame` as the current view for the lifetime of the guard.
///
/// Entering a view also interposes the tree-aware entry point as the active
/// low-level strategy, so flat [`inject`](crate::inject::inject) calls made
/// by running factories route through the tree without the flat layer ever
/// referencing it. Both the frame and the displaced strategy are restored
/// when the guard drops.
pub fn enter_view(frame: ViewFrame) -> ViewGuard {
    trace!(node = frame.node.0, "enter view");
    let previous_frame = CURRENT_VIEW.with(|slot| slot.replace(Some(frame)));
    let previous_impl = switch::set_inject_implementation(Some(view_inject as InjectImpl));
    ViewGuard {
        previous_frame,
        previous_impl,
    }
}

/// Scoped acquisition of the view frame.
///
/// Restores the displaced frame and injection strategy when dropped,
/// keeping restoration LIFO with view nesting on every exit path.
#[must_use = "the displaced frame is restored when the guard drops"]
pub struct ViewGuard {
    previous_frame: Option<ViewFrame>,
    previous_impl: Option<InjectImpl>,
}

impl Drop for ViewGuard {
    fn drop(&mut self) {
        switch::set_inject_implementation(self.previous_impl);
        CURRENT_VIEW.with(|slot| {
            *slot.borrow_mut() = self.previous_frame.take();
        });
    }
}
