use tasklist_core::error::AppError;

const DISABLE_ENV_VAR: &str = "TASKLIST_DISABLE_CLIPBOARD";

/// Destination for share links. Writes are fire-and-forget from the store's
/// point of view; failures only concern the session.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), AppError>;
}

pub struct NoopClipboard;

impl Clipboard for NoopClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// The desktop clipboard. The handle is kept for the whole session because
/// some platforms drop the contents when the owning handle goes away.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), AppError> {
        if self.handle.is_none() {
            let handle =
                arboard::Clipboard::new().map_err(|err| AppError::clipboard(err.to_string()))?;
            self.handle = Some(handle);
        }

        match self.handle.as_mut() {
            Some(handle) => handle
                .set_text(text.to_string())
                .map_err(|err| AppError::clipboard(err.to_string())),
            None => Err(AppError::clipboard("clipboard unavailable")),
        }
    }
}

pub fn clipboard_from_env() -> Box<dyn Clipboard> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        tracing::debug!("clipboard disabled by {DISABLE_ENV_VAR}");
        return Box::new(NoopClipboard);
    }
    Box::new(SystemClipboard::default())
}
