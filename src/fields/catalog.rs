//! フォーム画像・顔アンカー・体フィールドの固定テーブル

/// フォーム画像。ファイル名は起動時に一度だけ解決する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldAsset {
    IdentitySsn,
    IdentityANumber,
    IdentityGender,
    IdentityDateOfBirth,
    IdentityUscisStatus,
    IdentityCitizenship,
    IdentityBirthplace,
    PhysicalEyeColor,
    PhysicalHairColor,
    PhysicalWeight,
    PhysicalHeight,
    DemographicsMaritalStatus,
    DemographicsEthnicity,
    DemographicsRace,
    DemographicsIncome,
    FamilyFather,
    FamilyMother,
    FamilySpouse,
    FamilySpouseCitizenship,
    FamilyChildrenName,
    FamilyChildrenDateOfBirth,
    WorkOccupation,
    WorkEmployer,
    LegalEmployer,
    ContactAddress,
    ContactPhone,
    TravelDocument,
    TravelVisa,
    TravelCountry,
    Question1,
    Question2,
    Question3,
    Question4,
    Question5,
    Question6,
    Question7,
    Question8,
}

impl FieldAsset {
    pub const ALL: [FieldAsset; 37] = [
        Self::IdentitySsn,
        Self::IdentityANumber,
        Self::IdentityGender,
        Self::IdentityDateOfBirth,
        Self::IdentityUscisStatus,
        Self::IdentityCitizenship,
        Self::IdentityBirthplace,
        Self::PhysicalEyeColor,
        Self::PhysicalHairColor,
        Self::PhysicalWeight,
        Self::PhysicalHeight,
        Self::DemographicsMaritalStatus,
        Self::DemographicsEthnicity,
        Self::DemographicsRace,
        Self::DemographicsIncome,
        Self::FamilyFather,
        Self::FamilyMother,
        Self::FamilySpouse,
        Self::FamilySpouseCitizenship,
        Self::FamilyChildrenName,
        Self::FamilyChildrenDateOfBirth,
        Self::WorkOccupation,
        Self::WorkEmployer,
        Self::LegalEmployer,
        Self::ContactAddress,
        Self::ContactPhone,
        Self::TravelDocument,
        Self::TravelVisa,
        Self::TravelCountry,
        Self::Question1,
        Self::Question2,
        Self::Question3,
        Self::Question4,
        Self::Question5,
        Self::Question6,
        Self::Question7,
        Self::Question8,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::IdentitySsn => "identity_ssn_med.png",
            Self::IdentityANumber => "identity_anum_med.png",
            Self::IdentityGender => "identity_gender_med.png",
            Self::IdentityDateOfBirth => "identity_dob_small.png",
            Self::IdentityUscisStatus => "identity_uscis_status_small.png",
            Self::IdentityCitizenship => "identity_ctry_citizenship_small.png",
            Self::IdentityBirthplace => "identity_birthplace_med.png",
            Self::PhysicalEyeColor => "physical_eye_small.png",
            Self::PhysicalHairColor => "physical_hair_small.png",
            Self::PhysicalWeight => "physical_weight_small.png",
            Self::PhysicalHeight => "physical_height_small.png",
            Self::DemographicsMaritalStatus => "demographics_marital_status_med.png",
            Self::DemographicsEthnicity => "demographics_ethnicity_radio.png",
            Self::DemographicsRace => "demographics_race_checkbox.png",
            Self::DemographicsIncome => "demographics_income_radio.png",
            Self::FamilyFather => "family_father_med.png",
            Self::FamilyMother => "family_mother_med.png",
            Self::FamilySpouse => "family_spouse_med.png",
            Self::FamilySpouseCitizenship => "family_spouse_citizenship_med.png",
            Self::FamilyChildrenName => "family_children_name_med.png",
            Self::FamilyChildrenDateOfBirth => "family_children_dob_med.png",
            Self::WorkOccupation => "work_occupation_med.png",
            Self::WorkEmployer => "work_employer_med.png",
            Self::LegalEmployer => "legal_employer_med.png",
            Self::ContactAddress => "contact_address_med.png",
            Self::ContactPhone => "contact_phone_med.png",
            Self::TravelDocument => "travel_doc_med.png",
            Self::TravelVisa => "travel_visa_med.png",
            Self::TravelCountry => "travel_cntry_med.png",
            Self::Question1 => "questions_1_radio.png",
            Self::Question2 => "questions_2_radio.png",
            Self::Question3 => "questions_3_radio.png",
            Self::Question4 => "questions_4_radio.png",
            Self::Question5 => "questions_5_radio.png",
            Self::Question6 => "questions_6_radio.png",
            Self::Question7 => "questions_7_radio.png",
            Self::Question8 => "questions_8_radio.png",
        }
    }
}

/// 顔フィールドの意味的なレイヤー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceLayer {
    Identity,
    Physical,
    Demographics,
}

impl FaceLayer {
    /// 奥から手前への描画順
    pub const DRAW_ORDER: [FaceLayer; 3] = [Self::Demographics, Self::Physical, Self::Identity];

    /// 同じ位置に重なるフィールドをずらすオフセット (px)
    pub fn offset(self) -> (f32, f32) {
        match self {
            Self::Identity => (0.0, 0.0),
            Self::Physical => (10.0, 5.0),
            Self::Demographics => (20.0, 10.0),
        }
    }

    /// レイヤー内の描画順
    pub fn anchor_order(self) -> &'static [FaceAnchor] {
        match self {
            Self::Identity => &[
                FaceAnchor::TempleLeft,
                FaceAnchor::EyebrowCenter,
                FaceAnchor::ForeheadLeft,
                FaceAnchor::ForeheadRight,
                FaceAnchor::TempleRight,
                FaceAnchor::ForeheadCenter,
            ],
            Self::Physical => &[
                FaceAnchor::CheekLeft,
                FaceAnchor::CheekRight,
                FaceAnchor::JawLeft,
                FaceAnchor::JawRight,
            ],
            Self::Demographics => &[
                FaceAnchor::MouthLeft,
                FaceAnchor::MouthRight,
                FaceAnchor::LipBottom,
                FaceAnchor::NoseTip,
            ],
        }
    }
}

/// 顔メッシュ上の名前付きアンカー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceAnchor {
    ForeheadCenter,
    ForeheadLeft,
    ForeheadRight,
    TempleLeft,
    TempleRight,
    EyebrowCenter,
    CheekLeft,
    CheekRight,
    JawLeft,
    JawRight,
    NoseTip,
    MouthLeft,
    MouthRight,
    LipBottom,
}

impl FaceAnchor {
    /// FaceMesh 468点中のインデックス
    pub fn landmark_index(self) -> usize {
        match self {
            Self::ForeheadCenter => 10,
            Self::ForeheadLeft => 67,
            Self::ForeheadRight => 297,
            Self::TempleLeft => 21,
            Self::TempleRight => 251,
            Self::EyebrowCenter => 9,
            Self::CheekLeft => 116,
            Self::CheekRight => 345,
            Self::JawLeft => 172,
            Self::JawRight => 397,
            Self::NoseTip => 1,
            Self::MouthLeft => 61,
            Self::MouthRight => 291,
            Self::LipBottom => 18,
        }
    }
}

/// 顔アンカーに貼るフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceField {
    pub layer: FaceLayer,
    pub anchor: FaceAnchor,
    pub asset: FieldAsset,
}

const fn face(layer: FaceLayer, anchor: FaceAnchor, asset: FieldAsset) -> FaceField {
    FaceField {
        layer,
        anchor,
        asset,
    }
}

/// 顔フィールド（回転順もこの並び）
pub const FACE_FIELDS: [FaceField; 14] = [
    face(FaceLayer::Identity, FaceAnchor::ForeheadCenter, FieldAsset::IdentitySsn),
    face(FaceLayer::Identity, FaceAnchor::ForeheadLeft, FieldAsset::IdentityANumber),
    face(FaceLayer::Identity, FaceAnchor::ForeheadRight, FieldAsset::IdentityGender),
    face(FaceLayer::Identity, FaceAnchor::TempleLeft, FieldAsset::IdentityDateOfBirth),
    face(FaceLayer::Identity, FaceAnchor::TempleRight, FieldAsset::IdentityUscisStatus),
    face(FaceLayer::Identity, FaceAnchor::EyebrowCenter, FieldAsset::IdentityCitizenship),
    face(FaceLayer::Physical, FaceAnchor::CheekLeft, FieldAsset::PhysicalEyeColor),
    face(FaceLayer::Physical, FaceAnchor::CheekRight, FieldAsset::PhysicalHairColor),
    face(FaceLayer::Physical, FaceAnchor::JawLeft, FieldAsset::PhysicalWeight),
    face(FaceLayer::Physical, FaceAnchor::JawRight, FieldAsset::PhysicalHeight),
    face(FaceLayer::Demographics, FaceAnchor::NoseTip, FieldAsset::DemographicsMaritalStatus),
    face(FaceLayer::Demographics, FaceAnchor::MouthLeft, FieldAsset::DemographicsEthnicity),
    face(FaceLayer::Demographics, FaceAnchor::MouthRight, FieldAsset::DemographicsRace),
    face(FaceLayer::Demographics, FaceAnchor::LipBottom, FieldAsset::DemographicsIncome),
];

/// 額の上に持ち上げるフィールドと持ち上げ量 (px)
pub const FOREHEAD_LIFT: (FieldAsset, f32) = (FieldAsset::IdentitySsn, 80.0);

/// 体の範囲を漂うフィールド
pub const BODY_FIELDS: [FieldAsset; 24] = [
    FieldAsset::FamilyFather,
    FieldAsset::FamilyMother,
    FieldAsset::FamilySpouse,
    FieldAsset::FamilyChildrenName,
    FieldAsset::IdentityBirthplace,
    FieldAsset::WorkOccupation,
    FieldAsset::WorkEmployer,
    FieldAsset::ContactAddress,
    FieldAsset::ContactPhone,
    FieldAsset::TravelDocument,
    FieldAsset::TravelVisa,
    FieldAsset::FamilyChildrenDateOfBirth,
    FieldAsset::FamilySpouseCitizenship,
    FieldAsset::LegalEmployer,
    FieldAsset::TravelCountry,
    FieldAsset::IdentityANumber,
    FieldAsset::Question1,
    FieldAsset::Question2,
    FieldAsset::Question3,
    FieldAsset::Question4,
    FieldAsset::Question5,
    FieldAsset::Question6,
    FieldAsset::Question7,
    FieldAsset::Question8,
];

/// 顔フィールドの検索
pub fn face_field(layer: FaceLayer, anchor: FaceAnchor) -> Option<&'static FaceField> {
    FACE_FIELDS
        .iter()
        .find(|f| f.layer == layer && f.anchor == anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_unique() {
        let names: HashSet<_> = FieldAsset::ALL.iter().map(|a| a.file_name()).collect();
        assert_eq!(names.len(), FieldAsset::ALL.len());
    }

    #[test]
    fn test_every_anchor_order_entry_has_a_field() {
        let mut count = 0;
        for layer in FaceLayer::DRAW_ORDER {
            for anchor in layer.anchor_order() {
                assert!(face_field(layer, *anchor).is_some(), "{:?}/{:?}", layer, anchor);
                count += 1;
            }
        }
        assert_eq!(count, FACE_FIELDS.len());
    }

    #[test]
    fn test_landmark_indices_in_mesh() {
        for field in FACE_FIELDS {
            assert!(field.anchor.landmark_index() < crate::pose::FaceMesh::LANDMARK_COUNT);
        }
    }
}
