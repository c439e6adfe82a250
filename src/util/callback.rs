//! Change callbacks registered on observable containers.

use parking_lot::Mutex;
use std::sync::Arc;

pub(crate) type OnChangeInner<T> = Box<dyn FnMut(&T) + Send>;

/// The callback executed with the new value every time an observable container changes.
///
/// # Usage
/// ```
/// use notes_client::callback::OnChange;
///
/// let on_change: OnChange<bool> = OnChange::from(|loading: &bool| {
///     // Show or hide a spinner
/// });
/// ```
pub struct OnChange<T>(pub(crate) Arc<Mutex<OnChangeInner<T>>>);

impl<T> OnChange<T> {
    pub(crate) fn call(&self, value: &T) {
        let mut callback = self.0.lock();
        (*callback)(value);
    }
}

impl<T> Clone for OnChange<T> {
    fn clone(&self) -> Self {
        OnChange(self.0.clone())
    }
}

impl<T, F> From<F> for OnChange<T>
where
    F: FnMut(&T) + Send + 'static,
{
    fn from(f: F) -> Self {
        OnChange(Arc::new(Mutex::new(Box::new(f))))
    }
}
