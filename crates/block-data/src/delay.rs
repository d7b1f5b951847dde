//! Platform timers for simulated latency.

use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

/// Suspends the current task for a duration.
pub trait Delay {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Resolves immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        futures::future::ready(()).boxed_local()
    }
}

/// Tokio timer, used on native targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[cfg(not(target_arch = "wasm32"))]
impl Delay for TokioDelay {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed_local()
    }
}

/// `window.setTimeout` wrapped in a promise, used in the browser.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutDelay;

#[cfg(target_arch = "wasm32")]
impl Delay for TimeoutDelay {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().map(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
            });
            // Without a window there is nothing to wait on.
            if !matches!(scheduled, Some(Ok(_))) {
                let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
            }
        });

        async move {
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        }
        .boxed_local()
    }
}

/// The timer for the current target.
pub fn platform_delay() -> Rc<dyn Delay> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(TimeoutDelay)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(TokioDelay)
    }
}
