//! Word lists for synthetic patient and drug names.

pub const FIRST_NAMES: &[&str] = &[
  "Ana", "Beatriz", "Bruno", "Camila", "Carlos", "Daniela", "Diego", "Eduarda",
  "Felipe", "Fernanda", "Gabriel", "Helena", "Igor", "Isabela", "João", "Júlia",
  "Lucas", "Larissa", "Marcos", "Mariana", "Mateus", "Natália", "Otávio",
  "Patrícia", "Pedro", "Rafaela", "Renato", "Sofia", "Thiago", "Valentina",
  "Vinícius", "Yasmin",
];

pub const SURNAMES: &[&str] = &[
  "Almeida", "Barbosa", "Cardoso", "Carvalho", "Costa", "Dias", "Ferreira",
  "Gomes", "Lima", "Martins", "Melo", "Moraes", "Nascimento", "Oliveira",
  "Pereira", "Ribeiro", "Rocha", "Santos", "Silva", "Souza", "Teixeira",
];

pub const PRODUCT_ADJECTIVES: &[&str] = &[
  "Genérico", "Incrível", "Inteligente", "Leve", "Pequeno", "Prático",
  "Refinado", "Rústico", "Sensacional", "Sólido",
];

pub const PRODUCT_MATERIALS: &[&str] = &[
  "Algodão", "Borracha", "Concreto", "Granito", "Madeira", "Metal", "Plástico",
];

pub const PRODUCT_NOUNS: &[&str] = &[
  "Bacon", "Bola", "Cadeira", "Camisa", "Carro", "Chapéu", "Computador",
  "Mesa", "Peixe", "Queijo", "Salada", "Sapatos", "Teclado", "Toalhas",
];
