//! Response → output data: text lines for OCR, face records for celebrities.

use cloudsight_core::{
    BlockType, DetectDocumentTextResponse, FaceRecord, RecognitionResponse,
    RecognizeCelebritiesResponse,
};
use tracing::debug;

/// What the extractor produced for a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Lines(Vec<String>),
    Faces(Vec<FaceRecord>),
}

pub fn extract(response: &RecognitionResponse) -> Extracted {
    match response {
        RecognitionResponse::Document(doc) => Extracted::Lines(extract_lines(doc)),
        RecognitionResponse::Celebrities(celebs) => Extracted::Faces(extract_faces(celebs)),
    }
}

/// Text of every `LINE` block, in the order the service returned them.
pub fn extract_lines(response: &DetectDocumentTextResponse) -> Vec<String> {
    response
        .blocks
        .iter()
        .filter(|b| b.block_type == BlockType::Line)
        .map(|b| b.text.clone().unwrap_or_default())
        .collect()
}

/// One record per recognized celebrity. No confidence filtering here.
pub fn extract_faces(response: &RecognizeCelebritiesResponse) -> Vec<FaceRecord> {
    response
        .celebrity_faces
        .iter()
        .filter_map(|celeb| {
            let Some(bbox) = celeb.face.as_ref().and_then(|f| f.bounding_box) else {
                debug!(name = ?celeb.name, "Celebrity without a face bounding box; skipping");
                return None;
            };
            Some(FaceRecord::new(
                bbox,
                celeb.name.clone().unwrap_or_default(),
                celeb.match_confidence.unwrap_or(0.0),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsight_core::{Block, BoundingBox, Celebrity, ComparedFace};

    fn celeb(name: Option<&str>, conf: Option<f64>, bbox: Option<BoundingBox>) -> Celebrity {
        Celebrity {
            name: name.map(String::from),
            match_confidence: conf,
            face: Some(ComparedFace {
                bounding_box: bbox,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_only_lines_in_order() {
        let resp = DetectDocumentTextResponse {
            blocks: vec![
                Block::new(BlockType::Page, ""),
                Block::new(BlockType::Line, "1 caderno"),
                Block::new(BlockType::Word, "1"),
                Block::new(BlockType::Line, "2 borrachas"),
                Block::new(BlockType::Word, "borrachas"),
            ],
            ..Default::default()
        };
        assert_eq!(extract_lines(&resp), vec!["1 caderno", "2 borrachas"]);
    }

    #[test]
    fn no_lines_yields_empty() {
        let resp = DetectDocumentTextResponse {
            blocks: vec![Block::new(BlockType::Word, "solo")],
            ..Default::default()
        };
        assert!(extract_lines(&resp).is_empty());
        assert!(extract_lines(&DetectDocumentTextResponse::default()).is_empty());
    }

    #[test]
    fn cached_scenario_extracts_lapis() {
        let raw = r#"{"Blocks":[{"BlockType":"LINE","Text":"Lápis"},{"BlockType":"WORD","Text":"de"}]}"#;
        let resp: DetectDocumentTextResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_lines(&resp), vec!["Lápis".to_string()]);
    }

    #[test]
    fn faces_are_not_filtered_by_confidence() {
        let bbox = BoundingBox::new(0.1, 0.2, 0.3, 0.4);
        let resp = RecognizeCelebritiesResponse {
            celebrity_faces: vec![
                celeb(Some("Alta"), Some(99.0), Some(bbox)),
                celeb(Some("Baixa"), Some(12.0), Some(bbox)),
            ],
            ..Default::default()
        };
        let faces = extract_faces(&resp);
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[1], FaceRecord::new(bbox, "Baixa", 12.0));
    }

    #[test]
    fn missing_name_and_confidence_default() {
        let bbox = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        let resp = RecognizeCelebritiesResponse {
            celebrity_faces: vec![celeb(None, None, Some(bbox))],
            ..Default::default()
        };
        assert_eq!(extract_faces(&resp), vec![FaceRecord::new(bbox, "", 0.0)]);
    }

    #[test]
    fn faces_without_box_are_skipped() {
        let resp = RecognizeCelebritiesResponse {
            celebrity_faces: vec![celeb(Some("Sem Caixa"), Some(95.0), None)],
            ..Default::default()
        };
        assert!(extract_faces(&resp).is_empty());
    }

    #[test]
    fn dispatches_on_response_kind() {
        let resp = RecognitionResponse::Document(DetectDocumentTextResponse {
            blocks: vec![Block::new(BlockType::Line, "Cola")],
            ..Default::default()
        });
        assert_eq!(extract(&resp), Extracted::Lines(vec!["Cola".into()]));
    }
}
