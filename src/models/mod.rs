// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Utilisateurs (auth JWT, rôles user/admin)
//   - categorie_emotion : Catégories d'émotions (nom + couleur)
//   - emotion : Émotions sélectionnables lors d'un tracker
//   - menu : Rubriques regroupant les articles d'information
//   - info : Articles d'information
//   - tracker : Événements d'humeur enregistrés par les utilisateurs
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - La suppression est logique partout (actif=false + date_suppression)
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod categorie_emotion;
pub mod dto;
pub mod emotion;
pub mod info;
pub mod menu;
pub mod tracker;
pub mod users;
