pub(crate) mod drawer;
mod toasts;
