//! Population, capture and validation working together on one document.

use chrono::NaiveDate;
use inksign_core::{
    validate, ContractDocument, EventDisposition, InputEvent, MessageEvent, PointerAction,
    PopulationBridge, Rgba, StrokeCapture, StrokePoint, StrokeStyle, Surface, SurfaceBounds,
    TouchEvent, TouchPhase, TouchPoint, ValidationError,
};
use serde_json::json;

const ORIGIN: &str = "https://contracts.example.com";

/// Counts segments instead of drawing them.
#[derive(Default)]
struct CountingSurface {
    size: (u32, u32),
    segments: usize,
}

impl Surface for CountingSurface {
    fn reallocate(&mut self, width: u32, height: u32, _background: Rgba) {
        self.size = (width, height);
        self.segments = 0;
    }

    fn fill(&mut self, _color: Rgba) {
        self.segments = 0;
    }

    fn stroke_segment(&mut self, _from: StrokePoint, _to: StrokePoint, _style: &StrokeStyle) {
        self.segments += 1;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }
}

fn document() -> ContractDocument {
    ContractDocument::master_service_agreement(
        NaiveDate::from_ymd_opt(2026, 3, 9).expect("valid date"),
    )
}

fn touch(phase: TouchPhase, x: f32, y: f32) -> InputEvent {
    InputEvent::Touch(TouchEvent::new(
        phase,
        vec![TouchPoint {
            id: 1,
            client_x: x,
            client_y: y,
        }],
    ))
}

#[test]
fn test_query_population_then_validation() {
    let bridge = PopulationBridge::new(ORIGIN);
    let mut doc = document();

    assert!(bridge.apply_query(
        &mut doc,
        "?clientCompanyName=Acme+Ltd&clientContact=Grace%20Hopper&services=Audit,,Support",
    ));
    assert_eq!(doc.field_text("clientCompanyName"), Some("Acme Ltd"));
    assert_eq!(doc.field_text("clientRegistration"), Some("Not provided"));
    assert_eq!(
        doc.field_text("additionalNotes"),
        Some("No additional requirements specified.")
    );
    assert_eq!(doc.services(), ["Audit", "Support"]);
    assert_eq!(doc.signer_name(), "Grace Hopper");

    let mut capture = StrokeCapture::new(
        CountingSurface::default(),
        SurfaceBounds::new(10.0, 10.0, 300.0, 100.0),
    );
    assert_eq!(
        validate(&doc, capture.has_mark()),
        Err(ValidationError::MissingSignature)
    );

    assert_eq!(
        capture.handle_event(&touch(TouchPhase::Start, 20.0, 20.0)),
        EventDisposition::PreventDefault
    );
    capture.handle_event(&touch(TouchPhase::Move, 60.0, 40.0));
    capture.handle_event(&touch(TouchPhase::End, 60.0, 40.0));
    assert_eq!(capture.surface().segments, 1);

    assert!(validate(&doc, capture.has_mark()).is_ok());
}

#[test]
fn test_empty_query_leaves_template() {
    let bridge = PopulationBridge::new(ORIGIN);
    let mut doc = document();
    assert!(!bridge.apply_query(&mut doc, "?"));
    assert_eq!(
        doc.field_text("clientRegistration"),
        Some("[REGISTRATION NUMBER]")
    );
    assert_eq!(doc.client_company(), "Not Specified");
}

#[test]
fn test_message_from_embedding_origin() {
    let bridge = PopulationBridge::new(ORIGIN).trust_origin("https://crm.example.com");
    let mut doc = document();

    let populated = bridge.handle_message(
        &mut doc,
        &MessageEvent {
            origin: "https://crm.example.com".to_string(),
            data: json!({
                "type": "populateContract",
                "contractData": {
                    "clientCompanyName": "Initech",
                    "services": ["Hosting", " Backups "],
                    "paymentTerms": 30
                }
            }),
        },
    );

    assert!(populated);
    assert_eq!(doc.client_company(), "Initech");
    assert_eq!(doc.services(), ["Hosting", "Backups"]);
    assert_eq!(doc.field_text("paymentTerms"), Some("30"));
}

#[test]
fn test_pointer_leave_ends_stroke() {
    let mut capture = StrokeCapture::new(
        CountingSurface::default(),
        SurfaceBounds::new(0.0, 0.0, 100.0, 50.0),
    );
    let pointer = |action, x, y| InputEvent::Pointer {
        action,
        client_x: x,
        client_y: y,
    };

    capture.handle_event(&pointer(PointerAction::Down, 5.0, 5.0));
    capture.handle_event(&pointer(PointerAction::Move, 50.0, 25.0));
    capture.handle_event(&pointer(PointerAction::Leave, 150.0, 25.0));
    capture.handle_event(&pointer(PointerAction::Move, 60.0, 30.0));

    assert!(!capture.is_drawing());
    assert_eq!(capture.surface().segments, 1);

    capture.clear();
    assert!(!capture.has_mark());
}
