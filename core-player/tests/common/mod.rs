//! Shared in-memory fakes for the player integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::audio::{AudioEngine, AudioHandle, AudioSource};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::storage::{BlobStore, SettingsStore};
use bridge_traits::time::Clock;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use core_player::error::Result;
use core_player::resolver::SourceResolver;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Typed in-memory settings store mirroring the SQLite adapter's behavior:
/// reading a key back as a different type is an error.
pub struct MemorySettings {
    values: Mutex<HashMap<String, (String, &'static str)>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }

    fn set(&self, key: &str, value: String, value_type: &'static str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, value_type));
    }

    fn get(&self, key: &str, expected: &'static str) -> BridgeResult<Option<String>> {
        match self.values.lock().unwrap().get(key) {
            Some((value, value_type)) if *value_type == expected => Ok(Some(value.clone())),
            Some((_, value_type)) => Err(BridgeError::OperationFailed(format!(
                "Type mismatch: expected {}, got {}",
                expected, value_type
            ))),
            None => Ok(None),
        }
    }

    /// Raw persisted value, for asserting on persistence side effects.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone())
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()> {
        self.set(key, value.to_string(), "string");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> BridgeResult<Option<String>> {
        self.get(key, "string")
    }

    async fn set_bool(&self, key: &str, value: bool) -> BridgeResult<()> {
        self.set(key, value.to_string(), "bool");
        Ok(())
    }

    async fn get_bool(&self, key: &str) -> BridgeResult<Option<bool>> {
        match self.get(key, "bool")? {
            Some(s) => Ok(Some(s.parse().map_err(|_| {
                BridgeError::OperationFailed("Parse error".to_string())
            })?)),
            None => Ok(None),
        }
    }

    async fn set_i64(&self, key: &str, value: i64) -> BridgeResult<()> {
        self.set(key, value.to_string(), "i64");
        Ok(())
    }

    async fn get_i64(&self, key: &str) -> BridgeResult<Option<i64>> {
        match self.get(key, "i64")? {
            Some(s) => Ok(Some(s.parse().map_err(|_| {
                BridgeError::OperationFailed("Parse error".to_string())
            })?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> BridgeResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    async fn has_key(&self, key: &str) -> BridgeResult<bool> {
        Ok(self.values.lock().unwrap().contains_key(key))
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Deterministic clock advancing one second per `now()` call.
pub struct StepClock {
    ticks: AtomicI64,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_700_000_000 + tick, 0).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Audio engine
// ---------------------------------------------------------------------------

struct HandleState {
    playing: bool,
    looping: bool,
    position_ms: u64,
    reject_play: bool,
    gate: Option<Arc<Notify>>,
}

/// Observer side of one fake handle. Lets tests inspect engine state and
/// fire the natural end-of-stream signal.
pub struct Probe {
    state: Arc<Mutex<HandleState>>,
    ended_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl Probe {
    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn is_looping(&self) -> bool {
        self.state.lock().unwrap().looping
    }

    pub fn position_ms(&self) -> u64 {
        self.state.lock().unwrap().position_ms
    }

    pub fn advance_position(&self, ms: u64) {
        self.state.lock().unwrap().position_ms += ms;
    }

    /// Simulate the stream reaching its natural end.
    pub fn fire_ended(&self) {
        if let Some(tx) = self.ended_tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }
}

struct FakeHandle {
    state: Arc<Mutex<HandleState>>,
    ended_rx: Option<oneshot::Receiver<()>>,
}

#[async_trait]
impl AudioHandle for FakeHandle {
    async fn play(&mut self) -> BridgeResult<()> {
        let (reject, gate) = {
            let mut state = self.state.lock().unwrap();
            (state.reject_play, state.gate.take())
        };
        // A gated handle parks the start request until the test releases it.
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if reject {
            return Err(BridgeError::Rejected("no user gesture yet".to_string()));
        }
        self.state.lock().unwrap().playing = true;
        Ok(())
    }

    async fn stop(&mut self) -> BridgeResult<()> {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.position_ms = 0;
        Ok(())
    }

    async fn set_looping(&mut self, looping: bool) -> BridgeResult<()> {
        self.state.lock().unwrap().looping = looping;
        Ok(())
    }

    async fn position_ms(&self) -> BridgeResult<u64> {
        Ok(self.state.lock().unwrap().position_ms)
    }

    fn take_ended_signal(&mut self) -> Option<oneshot::Receiver<()>> {
        self.ended_rx.take()
    }
}

/// Fake engine recording every handle it hands out.
pub struct FakeEngine {
    gain: Mutex<f32>,
    probes: Mutex<Vec<Arc<Probe>>>,
    reject_next: AtomicBool,
    gate_next: Mutex<Option<Arc<Notify>>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            gain: Mutex::new(1.0),
            probes: Mutex::new(Vec::new()),
            reject_next: AtomicBool::new(false),
            gate_next: Mutex::new(None),
        }
    }

    pub fn gain(&self) -> f32 {
        *self.gain.lock().unwrap()
    }

    /// Probe for the n-th handle the engine created.
    pub fn probe(&self, index: usize) -> Arc<Probe> {
        self.probes.lock().unwrap()[index].clone()
    }

    pub fn handle_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    /// Make the next handle refuse its start request.
    pub fn reject_next_play(&self) {
        self.reject_next.store(true, Ordering::SeqCst);
    }

    /// Park the next handle's start request until the returned gate is
    /// notified, so a test can interleave calls mid-transition.
    pub fn gate_next_play(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate_next.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl AudioEngine for FakeEngine {
    async fn load(&self, _source: AudioSource) -> BridgeResult<Box<dyn AudioHandle>> {
        let state = Arc::new(Mutex::new(HandleState {
            playing: false,
            looping: false,
            position_ms: 0,
            reject_play: self.reject_next.swap(false, Ordering::SeqCst),
            gate: self.gate_next.lock().unwrap().take(),
        }));
        let (tx, rx) = oneshot::channel();
        self.probes.lock().unwrap().push(Arc::new(Probe {
            state: state.clone(),
            ended_tx: Mutex::new(Some(tx)),
        }));
        Ok(Box::new(FakeHandle {
            state,
            ended_rx: Some(rx),
        }))
    }

    async fn set_master_gain(&self, gain: f32) -> BridgeResult<()> {
        *self.gain.lock().unwrap() = gain;
        Ok(())
    }

    async fn master_gain(&self) -> BridgeResult<f32> {
        Ok(*self.gain.lock().unwrap())
    }
}

// ---------------------------------------------------------------------------
// Network and blob storage
// ---------------------------------------------------------------------------

/// In-memory blob store keyed by (tier, key).
pub struct MemoryBlobStore {
    inner: Mutex<HashMap<(String, String), Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn contains(&self, tier: &str, key: &str) -> BridgeResult<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .contains_key(&(tier.into(), key.into())))
    }

    async fn get(&self, tier: &str, key: &str) -> BridgeResult<Option<Bytes>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .get(&(tier.into(), key.into()))
            .cloned())
    }

    async fn put(&self, tier: &str, key: &str, data: Bytes) -> BridgeResult<()> {
        self.inner
            .lock()
            .unwrap()
            .insert((tier.into(), key.into()), data);
        Ok(())
    }

    async fn remove(&self, tier: &str, key: &str) -> BridgeResult<()> {
        self.inner.lock().unwrap().remove(&(tier.into(), key.into()));
        Ok(())
    }

    async fn keys(&self, tier: &str) -> BridgeResult<Vec<String>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .keys()
            .filter(|(t, _)| t == tier)
            .map(|(_, k)| k.clone())
            .collect())
    }
}

/// Scripted HTTP client with a toggleable offline switch.
pub struct ScriptedHttp {
    responses: Mutex<HashMap<String, (u16, Bytes)>>,
    offline: AtomicBool,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    pub fn respond(&self, url: &str, status: u16, body: &'static [u8]) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, Bytes::from_static(body)));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed("connection refused".into()));
        }
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .unwrap_or((404, Bytes::new()));
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body,
        })
    }

    async fn download_stream(
        &self,
        _url: String,
    ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        Err(BridgeError::NotAvailable("streaming not scripted".into()))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolver answering every sound id with a canned buffer.
pub struct CannedResolver;

#[async_trait]
impl SourceResolver for CannedResolver {
    async fn resolve(&self, _sound_id: &str) -> Result<AudioSource> {
        Ok(AudioSource::MemoryBuffer {
            data: Bytes::from_static(b"canned-audio"),
        })
    }
}
