//! ICE candidate gathering over `RTCPeerConnection`
//!
//! The connection is opened with an empty ICE server list, so the browser
//! only produces host candidates. That is exactly what the leak probe wants
//! to see: any routable address in those candidates came straight from the
//! local stack, no STUN round trip involved.

use std::cell::UnsafeCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::task::{Poll, Waker};

use async_trait::async_trait;
use futures::future;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    RtcConfiguration, RtcPeerConnection, RtcPeerConnectionIceEvent, RtcSessionDescriptionInit,
};

use crate::capability::{IceEvent, IceGathering, RtcProvider};
use crate::error::{CheckError, Result};

pub struct WasmRtcProvider;

impl WasmRtcProvider {
    pub fn new() -> Self {
        WasmRtcProvider
    }
}

impl RtcProvider for WasmRtcProvider {
    fn open_gathering(&self) -> Result<Box<dyn IceGathering>> {
        Ok(Box::new(WasmIceGathering::open()?))
    }
}

struct GatherState {
    events: VecDeque<IceEvent>,
    waker: Option<Waker>,
}

pub struct WasmIceGathering {
    pc: RtcPeerConnection,
    state: Rc<UnsafeCell<GatherState>>,
    closed: bool,
    // Keep the callback alive for the lifetime of the connection.
    _closures: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl WasmIceGathering {
    fn open() -> Result<Self> {
        let config = RtcConfiguration::new();
        config.set_ice_servers(&js_sys::Array::new());

        let pc = RtcPeerConnection::new_with_configuration(&config)
            .map_err(|e| CheckError::Unsupported(format!("RTCPeerConnection: {:?}", e)))?;

        let state = Rc::new(UnsafeCell::new(GatherState {
            events: VecDeque::new(),
            waker: None,
        }));

        let state_clone = state.clone();
        let cb = Closure::wrap(Box::new(move |event: JsValue| {
            let event: RtcPeerConnectionIceEvent = event.unchecked_into();
            // UnsafeCell is safe because WASM is single-threaded.
            let st = unsafe { &mut *state_clone.get() };
            st.events.push_back(match event.candidate() {
                Some(candidate) => IceEvent::Candidate(candidate.candidate()),
                None => IceEvent::Complete,
            });
            if let Some(waker) = st.waker.take() {
                waker.wake();
            }
        }) as Box<dyn FnMut(JsValue)>);
        pc.set_onicecandidate(Some(cb.as_ref().unchecked_ref()));

        // Candidate gathering only starts once the connection has something
        // to negotiate, so open a throwaway data channel.
        let _channel = pc.create_data_channel("probe");

        let gathering = WasmIceGathering {
            pc,
            state,
            closed: false,
            _closures: vec![cb],
        };
        gathering.start_offer();
        Ok(gathering)
    }

    /// Kick off the offer dance without waiting for it. Candidates arrive
    /// through the `onicecandidate` callback either way, and a failed offer
    /// simply means the gathering window elapses empty.
    fn start_offer(&self) {
        let pc = self.pc.clone();
        spawn_local(async move {
            let offer = match JsFuture::from(pc.create_offer()).await {
                Ok(offer) => offer.unchecked_into::<RtcSessionDescriptionInit>(),
                Err(e) => {
                    log::debug!("createOffer failed: {:?}", e);
                    return;
                }
            };
            if let Err(e) = JsFuture::from(pc.set_local_description(&offer)).await {
                log::debug!("setLocalDescription failed: {:?}", e);
            }
        });
    }
}

#[async_trait(?Send)]
impl IceGathering for WasmIceGathering {
    async fn next_event(&mut self) -> Result<IceEvent> {
        let state = self.state.clone();
        let event = future::poll_fn(move |cx| {
            // UnsafeCell is safe because WASM is single-threaded.
            let st = unsafe { &mut *state.get() };
            match st.events.pop_front() {
                Some(event) => Poll::Ready(event),
                None => {
                    st.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            }
        })
        .await;
        Ok(event)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.pc.set_onicecandidate(None);
        self.pc.close();
    }
}

impl Drop for WasmIceGathering {
    fn drop(&mut self) {
        self.close();
    }
}
