/// A value with a pending local change that is either kept or undone once
/// the remote call settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimistic<T> {
    confirmed: T,
    pending: Option<T>,
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self {
            confirmed: value,
            pending: None,
        }
    }

    /// What the UI should render right now.
    pub fn current(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.confirmed)
    }

    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn apply_optimistic(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub fn commit(&mut self) {
        if let Some(value) = self.pending.take() {
            self.confirmed = value;
        }
    }

    pub fn rollback(&mut self) {
        self.pending = None;
    }

    /// Apply `value`, run `call`, then commit on `Ok` or roll back on `Err`.
    pub async fn update<F, Fut, E>(&mut self, value: T, call: F) -> Result<(), E>
    where
        F: FnOnce(T) -> Fut,
        Fut: std::future::Future<Output = Result<(), E>>,
    {
        self.apply_optimistic(value.clone());
        match call(value).await {
            Ok(()) => {
                self.commit();
                Ok(())
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }
}
