use chrono::{DateTime, Utc};
use shared::{
    config::CalendarConfig,
    error::{AppError, AppResult},
};
use tokio::sync::mpsc;

// ディスパッチャが溜め込めるイベント数。あふれた分は捨てる
const DISPATCH_QUEUE_SIZE: usize = 64;

/// 外部カレンダーへ反映するイベント。
/// アクセストークンは投入時点で解決済みのものを持たせる
#[derive(Debug)]
pub struct CalendarEvent {
    pub access_token: String,
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

pub struct CalendarClient {
    http: reqwest::Client,
    api_base: String,
}

impl CalendarClient {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.clone(),
        }
    }

    // Google Calendar の events.insert を呼ぶ
    pub async fn insert_event(&self, event: &CalendarEvent) -> AppResult<()> {
        let url = format!("{}/calendars/primary/events", self.api_base);

        let res = self
            .http
            .post(&url)
            .bearer_auth(&event.access_token)
            .json(&event_body(event))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("calendar api: {e}")))?;

        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "calendar api returned {}",
                res.status()
            )));
        }

        Ok(())
    }
}

fn event_body(event: &CalendarEvent) -> serde_json::Value {
    serde_json::json!({
        "summary": event.summary,
        "description": event.description,
        "location": event.location,
        "start": { "dateTime": event.start_time.to_rfc3339() },
        "end": { "dateTime": event.end_time.to_rfc3339() },
    })
}

/// 予約の確定をカレンダーへ非同期に反映するディスパッチャ。
/// 送信の成否は予約操作には影響させず、失敗は warn ログに残すだけ
#[derive(Clone)]
pub struct CalendarDispatcher {
    tx: mpsc::Sender<CalendarEvent>,
}

impl CalendarDispatcher {
    pub fn spawn(client: CalendarClient) -> Self {
        let (tx, mut rx) = mpsc::channel::<CalendarEvent>(DISPATCH_QUEUE_SIZE);

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(e) = client.insert_event(&event).await {
                    tracing::warn!(
                        error.message = %e,
                        summary = %event.summary,
                        "カレンダーへの反映に失敗しました"
                    );
                }
            }
        });

        Self { tx }
    }

    // 呼び出し元をブロックしない。キューが一杯ならイベントを捨てて警告する
    pub fn dispatch(&self, event: CalendarEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::warn!(
                error.message = %e,
                "カレンダーイベントを送出できませんでした"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> CalendarEvent {
        CalendarEvent {
            access_token: "dummy-token".into(),
            summary: "予約: 会議室 A".into(),
            description: "目的: チーム定例".into(),
            location: Some("会議室 A".into()),
            start_time: Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2030, 1, 1, 11, 0, 0).unwrap(),
        }
    }

    #[test]
    fn event_body_has_calendar_v3_shape() {
        let body = event_body(&sample_event());
        assert_eq!(body["summary"], "予約: 会議室 A");
        assert_eq!(body["start"]["dateTime"], "2030-01-01T10:00:00+00:00");
        assert_eq!(body["end"]["dateTime"], "2030-01-01T11:00:00+00:00");
    }

    #[tokio::test]
    async fn dispatch_never_blocks_even_if_delivery_fails() {
        // 接続先が存在しなくても dispatch はすぐ戻り、
        // 失敗はワーカー側で握りつぶされる
        let client = CalendarClient::new(&CalendarConfig {
            api_base: "http://127.0.0.1:1".into(),
        });
        let dispatcher = CalendarDispatcher::spawn(client);

        for _ in 0..10 {
            dispatcher.dispatch(sample_event());
        }
    }
}
