//! Conversion from APIGEO DTOs to domain records.
//!
//! Routes are always converted, with fallbacks for missing fields. Segments
//! without a code or a numeric length cannot be placed along the road and
//! are skipped.

use tracing::debug;

use crate::domain::{MiniSegment, Route, SnvCode};

use super::types::{RouteDto, RoutesResponse, Scalar, SegmentDto, SegmentListDto};

/// Offset used when a route has no usable km mark.
pub const MISSING_KM: f64 = -1.0;

/// Segment type assumed when a route does not state one.
pub const DEFAULT_SEGMENT_TYPE: &str = "B";

fn text(value: &Option<Scalar>) -> Option<String> {
    value.as_ref().map(Scalar::as_text)
}

/// Convert one route DTO.
pub fn convert_route(dto: &RouteDto) -> Route {
    Route {
        id: text(&dto.id),
        segment_id: text(&dto.segment_id),
        br: text(&dto.br).unwrap_or_default(),
        uf: text(&dto.uf).unwrap_or_default(),
        segment_type: text(&dto.segment_type).unwrap_or_else(|| DEFAULT_SEGMENT_TYPE.to_string()),
        km: dto.km.as_ref().and_then(Scalar::as_f64).unwrap_or(MISSING_KM),
        lat: dto.lat.as_ref().and_then(Scalar::as_f64),
        lng: dto.lng.as_ref().and_then(Scalar::as_f64),
        version: text(&dto.version),
    }
}

/// Convert a route response of either shape.
pub fn convert_routes(response: &RoutesResponse) -> Vec<Route> {
    match response {
        RoutesResponse::Many(routes) => routes.iter().map(convert_route).collect(),
        RoutesResponse::One(route) => vec![convert_route(route)],
    }
}

/// Convert one segment, or `None` if it lacks a code or a numeric length.
pub fn convert_segment(dto: &SegmentDto) -> Option<MiniSegment> {
    let segment_id = text(&dto.segment_id)?;
    let length = dto.length.as_ref().and_then(Scalar::as_f64)?;

    Some(MiniSegment {
        segment_id,
        length,
        overlap: text(&dto.overlap),
    })
}

/// Convert a segment list, preserving order and skipping unusable entries.
pub fn convert_segment_list(dto: &SegmentListDto) -> Vec<MiniSegment> {
    let segments = dto.segments.as_deref().unwrap_or(&[]);

    segments
        .iter()
        .filter_map(|segment| {
            let converted = convert_segment(segment);
            match &converted {
                None => debug!(?segment, "skipping segment without code or length"),
                Some(mini) if SnvCode::parse(&mini.segment_id).is_err() => {
                    debug!(segment_id = %mini.segment_id, "segment code is not a valid SNV code");
                }
                Some(_) => {}
            }
            converted
        })
        .collect()
}
