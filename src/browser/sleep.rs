//! Timer plumbing for the gathering window

use std::time::Duration;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_timers::future::TimeoutFuture;

use crate::capability::SleepProvider;

pub struct WasmSleeper;

impl WasmSleeper {
    pub fn new() -> Self {
        WasmSleeper
    }
}

impl SleepProvider for WasmSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(duration.as_millis() as u32).boxed_local()
    }
}
