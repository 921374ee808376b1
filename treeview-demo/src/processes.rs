//! Sample process tree with simulated per-process metrics.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::info;
use rand::Rng;
use treeview::TreeNode;

/// Metrics shown for the most recently activated process.
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub label: String,
    pub pid: u32,
    pub cpu: u8,
    pub memory: u8,
    /// Last few CPU samples, oldest first.
    pub history: Vec<u8>,
}

const HISTORY_LEN: usize = 20;

impl ProcessInfo {
    fn random(label: &str) -> Self {
        let mut rng = rand::rng();
        let mut info = Self {
            label: label.to_string(),
            pid: rng.random_range(1000..10000),
            cpu: rng.random_range(0..100),
            memory: rng.random_range(0..100),
            history: Vec::with_capacity(HISTORY_LEN),
        };
        for _ in 0..HISTORY_LEN {
            info.sample();
        }
        info
    }

    /// Drift the metrics by a small random step.
    pub fn sample(&mut self) {
        self.cpu = drift(self.cpu);
        self.memory = drift(self.memory);
        self.history.push(self.cpu);
        if self.history.len() > HISTORY_LEN {
            self.history.remove(0);
        }
    }
}

fn drift(value: u8) -> u8 {
    let delta: i16 = rand::rng().random_range(-2..=2);
    (value as i16 + delta).clamp(0, 100) as u8
}

/// Most recently activated process, shared with the UI.
pub type Selected = Arc<Mutex<Option<ProcessInfo>>>;

/// Applications → sub-applications → features. Each feature is a process
/// whose activation takes a moment and occasionally fails.
pub fn build(selected: &Selected) -> Vec<TreeNode> {
    let apps = (1..=6).map(|i| {
        TreeNode::new(format!("Application {i}")).children((1..=4).map(|j| {
            TreeNode::new(format!("SubApp {i}.{j}"))
                .children((1..=3).map(|k| process(&format!("Feature {i}.{j}.{k}"), selected)))
        }))
    });
    vec![TreeNode::new("Applications").children(apps)]
}

fn process(label: &str, selected: &Selected) -> TreeNode {
    let info = Arc::new(Mutex::new(ProcessInfo::random(label)));
    let selected = selected.clone();

    TreeNode::new(label).on_activate(move || {
        let snapshot = info.lock().ok().map(|mut info| {
            info.sample();
            info.clone()
        });
        if let (Some(snapshot), Ok(mut current)) = (snapshot.clone(), selected.lock()) {
            *current = Some(snapshot);
        }

        let (delay, fails) = {
            let mut rng = rand::rng();
            (rng.random_range(300..1500), rng.random_bool(0.2))
        };

        async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let pid = snapshot.map(|s| s.pid).unwrap_or_default();
            if fails {
                return Err(treeview::BoxError::from(format!("process {pid} did not respond")));
            }
            info!("process {pid} refreshed after {delay}ms");
            Ok(())
        }
    })
}
