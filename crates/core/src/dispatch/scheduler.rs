use patient_reminders_domain::{ReminderLabel, ScheduledReminder};
use patient_reminders_infra::{IMailSender, ISys, ReminderContext};
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{error, info, warn};

/// A reminder waiting for its timer to fire
#[derive(Debug)]
struct DispatchJob {
    reminder: ScheduledReminder,
    fire_at: Instant,
    seq: u64,
    results: UnboundedSender<DispatchOutcome>,
}

impl PartialEq for DispatchJob {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DispatchJob {}

impl PartialOrd for DispatchJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DispatchJob {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchStatus {
    Sent,
    Failed(String),
}

/// The result of the single send attempt made for a reminder
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub label: ReminderLabel,
    pub recipient: String,
    pub remind_at: i64,
    pub status: DispatchStatus,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Handed out when reminders are armed. Yields one `DispatchOutcome` per
/// armed reminder as their timers fire.
#[derive(Debug)]
pub struct DispatchReceipt {
    armed: usize,
    results: UnboundedReceiver<DispatchOutcome>,
}

impl DispatchReceipt {
    /// Number of reminders armed with this receipt
    pub fn armed(&self) -> usize {
        self.armed
    }

    /// The next finished send attempt, `None` once every armed reminder
    /// has been attempted
    pub async fn next(&mut self) -> Option<DispatchOutcome> {
        self.results.recv().await
    }

    /// Waits until every armed reminder has been attempted
    pub async fn wait(mut self) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        while let Some(outcome) = self.next().await {
            match outcome.status {
                DispatchStatus::Sent => summary.sent += 1,
                DispatchStatus::Failed(_) => summary.failed += 1,
            }
        }
        if summary.sent + summary.failed < self.armed {
            warn!(
                "Only {} of {} armed reminders were attempted",
                summary.sent + summary.failed,
                self.armed
            );
        }
        summary
    }
}

struct Message {
    subject: String,
    body: String,
}

/// Fires every armed reminder at its scheduled instant.
///
/// A single timer loop owns all pending `DispatchJob`s ordered by fire
/// instant. When a timer elapses the send is spawned as its own task, so a
/// slow or failing mail sender never delays any other reminder. Armed
/// reminders can not be cancelled.
pub struct DispatchScheduler {
    jobs: UnboundedSender<Vec<DispatchJob>>,
    sys: Arc<dyn ISys>,
    seq: u64,
    handle: JoinHandle<()>,
}

impl DispatchScheduler {
    /// Starts the timer loop, must be called within a tokio runtime
    pub fn start(ctx: &ReminderContext) -> Self {
        let (jobs, receiver) = unbounded_channel();
        let message = Arc::new(Message {
            subject: ctx.config.mail.subject.clone(),
            body: ctx.config.mail.body.clone(),
        });
        let handle = tokio::spawn(run_timer_loop(receiver, ctx.mail.clone(), message));

        Self {
            jobs,
            sys: ctx.sys.clone(),
            seq: 0,
            handle,
        }
    }

    /// Arms one timer per reminder. Reminders that are already due fire
    /// right away.
    pub fn arm(&mut self, reminders: Vec<ScheduledReminder>) -> DispatchReceipt {
        let (results, receiver) = unbounded_channel();
        let armed = reminders.len();
        let now = Instant::now();
        let sys_now = self.sys.get_timestamp_millis();

        let jobs = reminders
            .into_iter()
            .map(|reminder| {
                let delay = (reminder.remind_at - sys_now).max(0) as u64;
                self.seq += 1;
                DispatchJob {
                    reminder,
                    fire_at: now + Duration::from_millis(delay),
                    seq: self.seq,
                    results: results.clone(),
                }
            })
            .collect::<Vec<_>>();

        if !jobs.is_empty() && self.jobs.send(jobs).is_err() {
            error!("The dispatch timer loop has stopped, {} reminders were not armed", armed);
        }

        DispatchReceipt {
            armed,
            results: receiver,
        }
    }

    /// Stops accepting reminders. Already armed reminders are still fired
    /// and the timer loop exits after the last one.
    pub fn close(self) -> JoinHandle<()> {
        drop(self.jobs);
        self.handle
    }
}

async fn run_timer_loop(
    mut incoming: UnboundedReceiver<Vec<DispatchJob>>,
    mail: Arc<dyn IMailSender>,
    message: Arc<Message>,
) {
    let mut pending: BinaryHeap<Reverse<DispatchJob>> = BinaryHeap::new();
    let mut accepting = true;

    loop {
        let next_fire_at = pending.peek().map(|Reverse(job)| job.fire_at);
        if !accepting && next_fire_at.is_none() {
            break;
        }

        tokio::select! {
            jobs = incoming.recv(), if accepting => match jobs {
                Some(jobs) => pending.extend(jobs.into_iter().map(Reverse)),
                None => accepting = false,
            },
            _ = sleep_until(next_fire_at.unwrap_or_else(Instant::now)), if next_fire_at.is_some() => {
                let now = Instant::now();
                while pending.peek().map_or(false, |Reverse(job)| job.fire_at <= now) {
                    if let Some(Reverse(job)) = pending.pop() {
                        tokio::spawn(dispatch(job, mail.clone(), message.clone()));
                    }
                }
            }
        }
    }
}

async fn dispatch(job: DispatchJob, mail: Arc<dyn IMailSender>, message: Arc<Message>) {
    let reminder = job.reminder;
    let status = match mail
        .send(&reminder.recipient, &message.subject, &message.body)
        .await
    {
        Ok(()) => {
            info!(
                "Sent {} reminder to {} scheduled at {}",
                reminder.label, reminder.recipient, reminder.remind_at
            );
            DispatchStatus::Sent
        }
        Err(e) => {
            error!(
                "Unable to send {} reminder to {} scheduled at {}: {:?}",
                reminder.label, reminder.recipient, reminder.remind_at, e
            );
            DispatchStatus::Failed(e.to_string())
        }
    };

    // The receipt may have been dropped by a caller that does not wait
    let _ = job.results.send(DispatchOutcome {
        label: reminder.label,
        recipient: reminder.recipient,
        remind_at: reminder.remind_at,
        status,
    });
}
