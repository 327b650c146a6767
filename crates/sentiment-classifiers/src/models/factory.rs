use crate::config::ClassifierType;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::naive_bayes::MultinomialNB;

/// Build an unfitted boxed classifier from its configuration.
pub fn build_classifier(classifier: &ClassifierType) -> Box<dyn ClassifierModel> {
    match classifier {
        ClassifierType::MultinomialNB { alpha, fit_prior } => {
            Box::new(MultinomialNB::new(*alpha, *fit_prior))
        }
    }
}
