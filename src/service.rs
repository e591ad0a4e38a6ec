//! Request handling around the scoring engine: score → band → suggestions.

use crate::models::{Health, ScanRequest, ScanResponse, ScoreBreakdown};
use crate::scoring::engine::{assess, score_band};
use crate::scoring::suggest::suggest_actions;

/// Score a single request.
pub fn handle_scan(req: &ScanRequest) -> ScanResponse {
    handle_scan_detailed(req).0
}

/// Score a single request, also returning the per-category breakdown.
pub fn handle_scan_detailed(req: &ScanRequest) -> (ScanResponse, ScoreBreakdown) {
    let assessment = assess(&req.signals);
    let score = assessment.score();
    let suggestions = suggest_actions(&assessment.reasons);

    let response = ScanResponse {
        domain: req.domain.clone(),
        score,
        band: score_band(score),
        reasons: assessment.reasons,
        suggestions,
    };
    (response, assessment.breakdown)
}

/// Static liveness status, independent of the engine.
pub fn health() -> Health {
    Health { status: "ok".to_string() }
}
