use gloo_timers::callback::Timeout;
use yew::prelude::*;

/// A message that hides itself after a fixed delay.
#[derive(Clone)]
pub struct DismissableMessage {
    /// The message currently on screen, if any.
    pub message: Option<String>,
    /// Show a message and restart the dismiss timer.
    pub show: Callback<String>,
    /// Hide the message now and cancel the timer.
    pub hide: Callback<()>,
}

/// Custom hook for a banner message auto-dismissed after `delay_ms`.
#[hook]
pub fn use_dismissable_message(delay_ms: u32) -> DismissableMessage {
    let message_handle: UseStateHandle<Option<String>> = use_state(|| None::<String>);
    // Dropping a `Timeout` cancels it, so replacing the handle resets the delay.
    let timer = use_mut_ref(|| None::<Timeout>);

    let show = {
        let message_setter = message_handle.clone();
        let timer = timer.clone();
        Callback::from(move |text: String| {
            message_setter.set(Some(text));
            let message_clearer = message_setter.clone();
            *timer.borrow_mut() = Some(Timeout::new(delay_ms, move || {
                message_clearer.set(None);
            }));
        })
    };

    let hide = {
        let message_setter = message_handle.clone();
        let timer = timer.clone();
        Callback::from(move |_: ()| {
            timer.borrow_mut().take();
            message_setter.set(None);
        })
    };

    DismissableMessage {
        message: (*message_handle).clone(),
        show,
        hide,
    }
}
