//! Location dialog steps and the host interface they run against

use async_trait::async_trait;

use crate::Result;
use crate::models::LocationDialogResponse;

pub mod required_fields;
pub mod retriever;

pub use required_fields::LocationRequiredFieldsDialog;
pub use retriever::LocationRetrieverDialog;

/// Primitives the hosting dialog engine offers to a running dialog step.
///
/// After `call`, the host owns the child dialog. Once the child finishes it
/// must hand the child's response back through
/// [`LocationRetrieverDialog::resume_after_child_dialog`].
#[async_trait]
pub trait DialogContext: Send {
    /// Suspend the current step and start the required-fields child dialog
    async fn call(&mut self, child: LocationRequiredFieldsDialog) -> Result<()>;

    /// Finish the current step and return the response to the caller
    async fn done(&mut self, response: LocationDialogResponse) -> Result<()>;
}
