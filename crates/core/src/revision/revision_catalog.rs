//! Built-in quick revision cards.

use super::revision_model::{Level, RevisionCard};

const fn card(
    id: u32,
    subject: &'static str,
    level: Level,
    title: &'static str,
    content: &'static str,
    category: &'static str,
) -> RevisionCard {
    RevisionCard {
        id,
        subject,
        level,
        title,
        content,
        category,
    }
}

use super::revision_model::Level::{Advanced as AL, Ordinary as OL};

pub static CATALOG: [RevisionCard; 30] = [
    card(1, "Mathematics", OL, "Quadratic Formula", "x = (-b ± √(b² - 4ac)) / 2a", "Algebra"),
    card(2, "Mathematics", OL, "Pythagoras Theorem", "a² + b² = c²\n\nIn a right triangle, the square of hypotenuse equals sum of squares of other two sides", "Geometry"),
    card(3, "Mathematics", OL, "Area Formulas", "• Circle: πr²\n• Triangle: ½ × base × height\n• Rectangle: length × width\n• Trapezium: ½(a+b) × h", "Mensuration"),
    card(4, "Mathematics", OL, "Trigonometry Ratios", "sin θ = Opposite / Hypotenuse\ncos θ = Adjacent / Hypotenuse\ntan θ = Opposite / Adjacent\n\nSOH CAH TOA", "Trigonometry"),
    card(5, "Mathematics", OL, "Probability", "P(Event) = Favorable Outcomes / Total Outcomes\n\n0 ≤ P(E) ≤ 1\nP(E) + P(E') = 1", "Statistics"),
    card(6, "Mathematics", OL, "Percentage Change", "% Change = ((New - Old) / Old) × 100\n\n% Increase → Positive\n% Decrease → Negative", "Numbers"),
    card(7, "Mathematics", AL, "Derivatives", "d/dx (xⁿ) = nxⁿ⁻¹\nd/dx (sin x) = cos x\nd/dx (cos x) = -sin x\nd/dx (eˣ) = eˣ\nd/dx (ln x) = 1/x", "Calculus"),
    card(8, "Mathematics", AL, "Integration Rules", "∫xⁿ dx = xⁿ⁺¹/(n+1) + C\n∫sin x dx = -cos x + C\n∫cos x dx = sin x + C\n∫eˣ dx = eˣ + C", "Calculus"),
    card(9, "Mathematics", AL, "Equations of Motion", "v = u + at\ns = ut + ½at²\nv² = u² + 2as\ns = ½(u + v)t", "Mechanics"),
    card(10, "Mathematics", AL, "Complex Numbers", "i² = -1\n|z| = √(a² + b²)\narg(z) = tan⁻¹(b/a)\nz* = a - bi (conjugate)", "Algebra"),
    card(11, "Physics", OL, "Newton's Laws", "1st: Object at rest stays at rest\n2nd: F = ma\n3rd: Every action has equal & opposite reaction", "Mechanics"),
    card(12, "Physics", OL, "Ohm's Law", "V = IR\n\nV = Voltage (V)\nI = Current (A)\nR = Resistance (Ω)", "Electricity"),
    card(13, "Physics", OL, "Wave Equation", "v = fλ\n\nv = velocity\nf = frequency\nλ = wavelength", "Waves"),
    card(14, "Physics", AL, "Coulomb's Law", "F = kq₁q₂/r²\n\nk = 9 × 10⁹ Nm²/C²", "Electrostatics"),
    card(15, "Physics", AL, "Capacitance", "C = Q/V\nC = ε₀A/d (parallel plate)\n\nSeries: 1/C = 1/C₁ + 1/C₂\nParallel: C = C₁ + C₂", "Electricity"),
    card(16, "Physics", AL, "Photoelectric Effect", "E = hf = hc/λ\nKE = hf - φ\n\nh = 6.63 × 10⁻³⁴ Js", "Modern Physics"),
    card(17, "Physics", AL, "E = mc²", "Energy-Mass Equivalence\n\nE = mc²\nc = 3 × 10⁸ m/s", "Modern Physics"),
    card(18, "Chemistry", OL, "pH Scale", "pH = -log[H⁺]\n\npH < 7: Acid\npH = 7: Neutral\npH > 7: Base", "Acids & Bases"),
    card(19, "Chemistry", OL, "Periodic Table Groups", "Group 1: Alkali Metals\nGroup 2: Alkaline Earth\nGroup 17: Halogens\nGroup 18: Noble Gases", "Periodic Table"),
    card(20, "Chemistry", AL, "Ideal Gas Law", "PV = nRT\n\nR = 8.314 J/mol·K\n\nAt STP:\nT = 273K, P = 101.3 kPa", "Physical Chemistry"),
    card(21, "Chemistry", AL, "Organic Homologous Series", "Alkanes: CₙH₂ₙ₊₂\nAlkenes: CₙH₂ₙ\nAlkynes: CₙH₂ₙ₋₂\nAlcohols: CₙH₂ₙ₊₁OH", "Organic Chemistry"),
    card(22, "Chemistry", AL, "Electrochemical Series", "K > Na > Ca > Mg > Al > Zn > Fe > H > Cu > Ag > Au\n\nMore reactive → Better reducing agent", "Electrochemistry"),
    card(23, "Biology", OL, "Photosynthesis", "6CO₂ + 6H₂O → C₆H₁₂O₆ + 6O₂\n\nLight + Chlorophyll required\nOccurs in chloroplasts", "Plant Biology"),
    card(24, "Biology", OL, "Respiration", "C₆H₁₂O₆ + 6O₂ → 6CO₂ + 6H₂O + Energy\n\nAerobic: With oxygen\nAnaerobic: Without oxygen", "Cell Biology"),
    card(25, "Biology", AL, "DNA Structure", "A-T (2 H-bonds)\nG-C (3 H-bonds)\n\nAntiparallel strands\n5' to 3' direction", "Genetics"),
    card(26, "Biology", AL, "Mendelian Ratios", "Monohybrid: 3:1\nDihybrid: 9:3:3:1\nTest Cross: 1:1\nCodominance: 1:2:1", "Genetics"),
    card(27, "Biology", AL, "Krebs Cycle", "Location: Mitochondria\n\nProducts per cycle:\n• 3 NADH\n• 1 FADH₂\n• 1 ATP\n• 2 CO₂", "Biochemistry"),
    card(28, "Economics", AL, "GDP Formula", "GDP = C + I + G + (X - M)\n\nC = Consumption\nI = Investment\nG = Government\nX = Exports\nM = Imports", "Macroeconomics"),
    card(29, "Economics", AL, "Price Elasticity", "Ed = (% Change in Qd) / (% Change in P)\n\nEd > 1: Elastic\nEd < 1: Inelastic\nEd = 1: Unit elastic", "Microeconomics"),
    card(30, "Economics", AL, "Inflation Types", "• Demand-Pull: Too much money\n• Cost-Push: Rising production costs\n• Built-in: Wage-price spiral", "Macroeconomics"),
];

/// Subjects in catalog order.
pub fn subjects() -> Vec<&'static str> {
    let mut subjects: Vec<&'static str> = Vec::new();
    for card in CATALOG.iter() {
        if !subjects.contains(&card.subject) {
            subjects.push(card.subject);
        }
    }
    subjects
}

/// Cards for one subject and level, in catalog order.
pub fn cards_for(subject: &str, level: Level) -> Vec<&'static RevisionCard> {
    CATALOG
        .iter()
        .filter(|c| c.subject == subject && c.level == level)
        .collect()
}

pub fn card_by_id(id: u32) -> Option<&'static RevisionCard> {
    CATALOG.iter().find(|c| c.id == id)
}
