//! Built-in PlantVillage taxonomy (38 classes) and its care table.
//!
//! Row order is the model output order.

/// `(raw_label, disease, solution)`
pub const PLANT_VILLAGE: &[(&str, &str, &str)] = &[
    (
        "Apple___Apple_scab",
        "Apple Scab",
        "Prune infected leaves and apply fungicide labeled for scab control.",
    ),
    (
        "Apple___Black_rot",
        "Apple Black Rot",
        "Remove mummified fruit and use a copper-based fungicide during dormancy.",
    ),
    (
        "Apple___Cedar_apple_rust",
        "Cedar Apple Rust",
        "Eliminate nearby junipers and spray sulfur fungicide early in the season.",
    ),
    (
        "Apple___healthy",
        "Healthy Apple Leaf",
        "No treatment needed; continue normal care.",
    ),
    (
        "Blueberry___healthy",
        "Healthy Blueberry Leaf",
        "No treatment needed; maintain balanced watering.",
    ),
    (
        "Cherry_(including_sour)___Powdery_mildew",
        "Cherry Powdery Mildew",
        "Improve air flow by pruning and apply potassium bicarbonate spray.",
    ),
    (
        "Cherry_(including_sour)___healthy",
        "Healthy Cherry Leaf",
        "No treatment needed; continue routine monitoring.",
    ),
    (
        "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
        "Corn Gray Leaf Spot",
        "Rotate crops and apply a strobilurin fungicide at early tasseling.",
    ),
    (
        "Corn_(maize)___Common_rust_",
        "Corn Common Rust",
        "Plant resistant hybrids and consider a triazole fungicide if severe.",
    ),
    (
        "Corn_(maize)___Northern_Leaf_Blight",
        "Corn Northern Leaf Blight",
        "Remove crop debris and spray fungicide at tasseling if weather is humid.",
    ),
    (
        "Corn_(maize)___healthy",
        "Healthy Corn Leaf",
        "No treatment needed; keep fertilization on schedule.",
    ),
    (
        "Grape___Black_rot",
        "Grape Black Rot",
        "Remove infected clusters and spray captan or myclobutanil early in season.",
    ),
    (
        "Grape___Esca_(Black_Measles)",
        "Grape Esca (Black Measles)",
        "Prune out infected wood and maintain vine vigor; chemical control is limited.",
    ),
    (
        "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
        "Grape Leaf Blight",
        "Improve canopy ventilation and apply fungicide labeled for leaf blight.",
    ),
    (
        "Grape___healthy",
        "Healthy Grape Leaf",
        "No treatment needed; continue canopy management.",
    ),
    (
        "Orange___Haunglongbing_(Citrus_greening)",
        "Citrus Greening (HLB)",
        "Remove infected trees and control psyllid vectors immediately.",
    ),
    (
        "Peach___Bacterial_spot",
        "Peach Bacterial Spot",
        "Apply copper spray at bud break and remove heavily infected twigs.",
    ),
    (
        "Peach___healthy",
        "Healthy Peach Leaf",
        "No treatment needed; ensure regular fertilization.",
    ),
    (
        "Pepper,_bell___Bacterial_spot",
        "Bell Pepper Bacterial Spot",
        "Use resistant varieties and apply fixed copper spray weekly during outbreaks.",
    ),
    (
        "Pepper,_bell___healthy",
        "Healthy Pepper Leaf",
        "No treatment needed; maintain even watering.",
    ),
    (
        "Potato___Early_blight",
        "Potato Early Blight",
        "Remove infected foliage and spray chlorothalonil or mancozeb preventatively.",
    ),
    (
        "Potato___Late_blight",
        "Potato Late Blight",
        "Destroy infected plants and apply a systemic fungicide immediately.",
    ),
    (
        "Potato___healthy",
        "Healthy Potato Leaf",
        "No treatment needed; keep soil consistently moist.",
    ),
    (
        "Raspberry___healthy",
        "Healthy Raspberry Leaf",
        "No treatment needed; maintain pruning schedule.",
    ),
    (
        "Soybean___healthy",
        "Healthy Soybean Leaf",
        "No treatment needed; monitor for pests regularly.",
    ),
    (
        "Squash___Powdery_mildew",
        "Squash Powdery Mildew",
        "Remove infected leaves and spray neem oil or sulfur weekly.",
    ),
    (
        "Strawberry___Leaf_scorch",
        "Strawberry Leaf Scorch",
        "Increase irrigation, remove damaged leaves, and apply fungicide if severe.",
    ),
    (
        "Strawberry___healthy",
        "Healthy Strawberry Leaf",
        "No treatment needed; keep mulch dry.",
    ),
    (
        "Tomato___Bacterial_spot",
        "Tomato Bacterial Spot",
        "Remove infected foliage and apply copper spray every 7 days.",
    ),
    (
        "Tomato___Early_blight",
        "Tomato Early Blight",
        "Mulch to reduce soil splash and use a chlorothalonil fungicide weekly.",
    ),
    (
        "Tomato___Late_blight",
        "Tomato Late Blight",
        "Remove plants and treat with a systemic fungicide immediately.",
    ),
    (
        "Tomato___Leaf_Mold",
        "Tomato Leaf Mold",
        "Improve greenhouse ventilation and spray potassium bicarbonate.",
    ),
    (
        "Tomato___Septoria_leaf_spot",
        "Tomato Septoria Leaf Spot",
        "Prune lower leaves and apply copper fungicide every 7-10 days.",
    ),
    (
        "Tomato___Spider_mites Two-spotted_spider_mite",
        "Tomato Spider Mite Damage",
        "Rinse foliage, release predatory mites, or apply insecticidal soap.",
    ),
    (
        "Tomato___Target_Spot",
        "Tomato Target Spot",
        "Remove infected tissue and rotate with non-host crops.",
    ),
    (
        "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
        "Tomato Yellow Leaf Curl Virus",
        "Control whiteflies and remove infected plants promptly.",
    ),
    (
        "Tomato___Tomato_mosaic_virus",
        "Tomato Mosaic Virus",
        "Discard infected plants and disinfect tools with bleach solution.",
    ),
    (
        "Tomato___healthy",
        "Healthy Tomato Leaf",
        "No treatment needed; maintain balanced nutrition.",
    ),];

/// Built-in label list in model output order.
pub fn default_labels() -> Vec<String> {
    PLANT_VILLAGE.iter().map(|(label, _, _)| label.to_string()).collect()
}
