use crate::actuator::{
    CommandAck, RemoteAuditRecord, StatusReport, Telemetry, TelemetryError,
};

/// Keeps every document, plus the order kinds arrived in
/// (`"report"`, `"ack"`, `"audit"`).
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    pub reports: Vec<StatusReport>,
    pub acks: Vec<CommandAck>,
    pub audits: Vec<RemoteAuditRecord>,
    pub order: Vec<String>,
    fail_with: Option<TelemetryError>,
}

impl RecordingTelemetry {
    /// Rejects every document with `err`.
    pub fn failing(err: TelemetryError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    fn check(&mut self, kind: &str) -> Result<(), TelemetryError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.order.push(kind.to_string());
        Ok(())
    }
}

impl Telemetry for RecordingTelemetry {
    fn report(&mut self, report: &StatusReport) -> Result<(), TelemetryError> {
        self.check("report")?;
        self.reports.push(report.clone());
        Ok(())
    }

    fn acknowledge(&mut self, ack: &CommandAck) -> Result<(), TelemetryError> {
        self.check("ack")?;
        self.acks.push(ack.clone());
        Ok(())
    }

    fn audit(&mut self, record: &RemoteAuditRecord) -> Result<(), TelemetryError> {
        self.check("audit")?;
        self.audits.push(record.clone());
        Ok(())
    }
}
